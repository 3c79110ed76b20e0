//! Business rules for the portal. Handlers stay thin and call into
//! `PortalService`; the service talks to storage only through `PortalStore`.

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::JwtError;
use crate::config::{ApiConfig, AppConfig, SecurityConfig};
use crate::database::models::{Internship, User};
use crate::database::{PortalStore, StoreError};
use crate::types::{FieldErrors, InternshipPhase, ReviewStatus, TransitionError};

pub mod auth;
pub mod faculty;
pub mod principal;
pub mod student;
pub mod uploads;

pub use auth::LoginResult;
pub use faculty::{FacultyDashboard, StudentDetail};
pub use principal::InstitutionDashboard;
pub use uploads::{UploadRequest, UploadStore};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("upload exceeds limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Password(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct PortalService {
    store: Arc<dyn PortalStore>,
    uploads: UploadStore,
    security: SecurityConfig,
    api: ApiConfig,
}

impl PortalService {
    pub fn new(store: Arc<dyn PortalStore>, config: &AppConfig) -> Self {
        Self {
            store,
            uploads: UploadStore::new(config.uploads.dir.clone(), config.uploads.max_bytes),
            security: config.security.clone(),
            api: config.api.clone(),
        }
    }

    pub fn store(&self) -> &Arc<dyn PortalStore> {
        &self.store
    }

    async fn load_user(&self, id: Uuid) -> ServiceResult<User> {
        self.store.find_user(id).await?.ok_or(ServiceError::NotFound("user"))
    }

    async fn load_internship(&self, id: Uuid) -> ServiceResult<Internship> {
        self.store
            .find_internship(id)
            .await?
            .ok_or(ServiceError::NotFound("internship"))
    }

    /// Move `internship` to `next`, enforcing the transition table and the
    /// rule that only approved internships can become active.
    fn apply_phase(internship: &mut Internship, next: InternshipPhase) -> ServiceResult<()> {
        if next == InternshipPhase::Active && internship.review_status != ReviewStatus::Approved {
            return Err(ServiceError::Conflict(format!(
                "internship must be APPROVED before it can become ACTIVE (currently {})",
                internship.review_status
            )));
        }
        internship.internship_phase = internship.internship_phase.transition(next)?;
        Ok(())
    }

    /// Persist a modified internship, guarding against concurrent writers
    async fn save_internship(&self, mut internship: Internship) -> ServiceResult<Internship> {
        let previous = internship.updated_at;
        internship.updated_at = Utc::now();
        Ok(self.store.update_internship(internship, previous).await?)
    }
}
