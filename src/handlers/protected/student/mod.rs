// handlers/protected/student/mod.rs - /api/student/* (STUDENT role)

pub mod document;
pub mod internship;
pub mod profile;

pub use document::{documents_get, documents_post};
pub use internship::{internship_get, internship_patch, internships_get, internships_post};
pub use profile::{profile_get, profile_put};
