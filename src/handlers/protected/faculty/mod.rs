// handlers/protected/faculty/mod.rs - /api/faculty/* (FACULTY role)
//
// Every lookup is scoped to the caller's mentees; anything else is a 404.

pub mod internship;
pub mod profile;
pub mod student;

pub use internship::{documents_get, internship_get, internships_get, phase_patch, review_post};
pub use profile::{dashboard_get, profile_get};
pub use student::{student_get, students_get};
