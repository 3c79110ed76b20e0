use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{FieldErrors, Role};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(skip)]
    pub password_hash: String,
    pub department: Option<String>,
    pub roll_number: Option<String>,
    pub mentor_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating any kind of user (CLI, bootstrap and self-registration)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
}

impl NewUser {
    pub const MIN_PASSWORD_LEN: usize = 8;

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email".to_string(), "is required".to_string());
        } else if !is_plausible_email(email) {
            errors.insert("email".to_string(), "is not a valid email address".to_string());
        }
        if self.name.trim().is_empty() {
            errors.insert("name".to_string(), "is required".to_string());
        }
        if self.password.chars().count() < Self::MIN_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                format!("must be at least {} characters", Self::MIN_PASSWORD_LEN),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Editable profile fields; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub department: Option<String>,
    pub roll_number: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, user: &mut User) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                errors.insert("name".to_string(), "must not be empty".to_string());
            } else {
                user.name = name.trim().to_string();
            }
        }
        if let Some(department) = self.department {
            user.department = non_empty(department);
        }
        if let Some(roll_number) = self.roll_number {
            user.roll_number = non_empty(roll_number);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub mentor_id: Option<Uuid>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
