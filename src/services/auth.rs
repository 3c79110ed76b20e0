use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{PortalService, ServiceError, ServiceResult};
use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::database::models::user::non_empty;
use crate::database::models::{normalize_email, NewUser, User};
use crate::database::StoreError;
use crate::types::Role;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    pub user: User,
    /// Seconds until the token expires
    pub expires_in: u64,
}

impl PortalService {
    /// Unknown email, wrong password and deactivated accounts all fail the
    /// same way so the response does not reveal which one it was.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<LoginResult> {
        let user = self
            .store
            .find_user_by_email(&normalize_email(email))
            .await?
            .filter(|u| u.is_active)
            .ok_or(ServiceError::InvalidCredentials)?;

        let (candidate, stored) = (password.to_string(), user.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored)).await?;
        if !verified {
            tracing::warn!("Failed login for {}", user.email);
            return Err(ServiceError::InvalidCredentials);
        }

        tracing::info!("User {} ({}) logged in", user.email, user.role);
        self.issue_token(user)
    }

    /// Re-issue a token for an existing, still active user
    pub async fn refresh(&self, user_id: Uuid) -> ServiceResult<LoginResult> {
        let user = self.load_user(user_id).await?;
        if !user.is_active {
            return Err(ServiceError::InvalidCredentials);
        }
        self.issue_token(user)
    }

    pub async fn create_user(&self, new_user: NewUser, role: Role) -> ServiceResult<User> {
        new_user.validate()?;

        let cost = self.security.password_cost;
        let password = new_user.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;

        let now = Utc::now();
        let email = normalize_email(&new_user.email);
        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            name: new_user.name.trim().to_string(),
            role,
            password_hash,
            department: new_user.department.and_then(non_empty),
            roll_number: new_user.roll_number.and_then(non_empty),
            mentor_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let user = self.store.insert_user(user).await.map_err(|e| match e {
            StoreError::Conflict(_) => ServiceError::Conflict(format!("email '{}' is already registered", email)),
            other => other.into(),
        })?;

        tracing::info!("Created {} account {} ({})", user.role, user.email, user.id);
        Ok(user)
    }

    /// Public sign-up; only ever creates students
    pub async fn register_student(&self, new_user: NewUser) -> ServiceResult<LoginResult> {
        if !self.security.allow_self_registration {
            return Err(ServiceError::Forbidden("Self-registration is disabled".to_string()));
        }
        let user = self.create_user(new_user, Role::Student).await?;
        self.issue_token(user)
    }

    /// Create the principal account from bootstrap credentials unless one
    /// with that email already exists.
    pub async fn ensure_principal(&self, new_user: NewUser) -> ServiceResult<User> {
        if let Some(existing) = self.store.find_user_by_email(&normalize_email(&new_user.email)).await? {
            if existing.role != Role::Principal {
                return Err(ServiceError::Conflict(format!(
                    "bootstrap email {} belongs to a {} account",
                    existing.email, existing.role
                )));
            }
            return Ok(existing);
        }
        self.create_user(new_user, Role::Principal).await
    }

    fn issue_token(&self, user: User) -> ServiceResult<LoginResult> {
        let claims = Claims::for_user(&user, &self.security)?;
        let token = generate_jwt(&claims, &self.security)?;
        Ok(LoginResult {
            token,
            user,
            expires_in: self.security.jwt_expiry_hours.saturating_mul(3600),
        })
    }
}
