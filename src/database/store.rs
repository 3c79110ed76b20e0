use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Document, Internship, InternshipFilter, PhaseSummary, User, UserFilter};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Storage abstraction so the service layer runs against Postgres in
/// production and an in-memory map in tests.
#[async_trait]
pub trait PortalStore: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Fails with `Conflict` when the (normalized) email is taken
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;
    async fn update_user(&self, user: User) -> Result<User, StoreError>;

    async fn insert_internship(&self, internship: Internship) -> Result<Internship, StoreError>;
    async fn find_internship(&self, id: Uuid) -> Result<Option<Internship>, StoreError>;
    /// Newest first; honours `limit`/`offset`
    async fn list_internships(&self, filter: &InternshipFilter) -> Result<Vec<Internship>, StoreError>;
    /// Persist `internship` only if the stored row still has `expected_updated_at`.
    /// A concurrent write in between yields `Conflict`.
    async fn update_internship(
        &self,
        internship: Internship,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Internship, StoreError>;
    /// Counts ignore `limit`/`offset`
    async fn summarize_internships(&self, filter: &InternshipFilter) -> Result<PhaseSummary, StoreError>;

    async fn insert_document(&self, document: Document) -> Result<Document, StoreError>;
    async fn list_documents(&self, internship_id: Uuid) -> Result<Vec<Document>, StoreError>;
}
