pub mod format;

pub use format::{internship_views, InternshipView, StudentDetailView};
