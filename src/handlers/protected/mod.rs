// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here runs behind jwt_auth → validate_user; the student and
// faculty groups additionally sit behind a role guard.

pub mod auth;
pub mod faculty;
pub mod student;
