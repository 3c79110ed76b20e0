// handlers/elevated/principal/mod.rs - /api/principal/*

pub mod dashboard;
pub mod internship;
pub mod people;

pub use dashboard::dashboard_get;
pub use internship::internships_get;
pub use people::{faculty_get, mentor_put, students_get};
