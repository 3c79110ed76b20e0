pub mod document;
pub mod internship;
pub mod user;

pub use document::Document;
pub use internship::{
    Internship, InternshipFilter, InternshipQuery, InternshipSubmission, InternshipUpdate, PhaseChange,
    PhaseSummary, ReviewRequest,
};
pub use user::{normalize_email, NewUser, ProfileUpdate, User, UserFilter};
