pub mod mentor;
pub mod migrate;
pub mod user;
