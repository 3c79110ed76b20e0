use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::types::Role;

pub mod password;

pub use password::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    pub fn for_user(user: &User, security: &SecurityConfig) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(security.jwt_expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::InvalidExpiry(security.jwt_expiry_hours))?
            .timestamp();

        Ok(Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp,
            iat: now.timestamp(),
            iss: security.jwt_issuer.clone(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT expiry of {0} hours is out of range")]
    InvalidExpiry(u64),
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate signature, expiry and issuer; return the claims
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[security.jwt_issuer.as_str()]);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn student() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "asha@college.edu".to_string(),
            name: "Asha".to_string(),
            role: Role::Student,
            password_hash: String::new(),
            department: None,
            roll_number: None,
            mentor_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_validates() {
        let security = AppConfig::development().security;
        let user = student();
        let token = generate_jwt(&Claims::for_user(&user, &security).unwrap(), &security).unwrap();

        let claims = validate_jwt(&token, &security).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.iss, "internship-portal");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let security = AppConfig::development().security;
        let mut other = security.clone();
        other.jwt_secret = "another-secret".to_string();

        let token = generate_jwt(&Claims::for_user(&student(), &other).unwrap(), &other).unwrap();
        assert!(matches!(validate_jwt(&token, &security), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = AppConfig::development().security;
        let mut claims = Claims::for_user(&student(), &security).unwrap();
        claims.iat -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;

        let token = generate_jwt(&claims, &security).unwrap();
        assert!(validate_jwt(&token, &security).is_err());
    }

    #[test]
    fn empty_secret_never_signs() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        let claims = Claims::for_user(&student(), &security).unwrap();
        assert!(matches!(generate_jwt(&claims, &security), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn huge_expiry_is_an_error_not_a_panic() {
        let mut security = AppConfig::development().security;
        security.jwt_expiry_hours = u64::MAX;
        assert!(matches!(
            Claims::for_user(&student(), &security),
            Err(JwtError::InvalidExpiry(u64::MAX))
        ));

        security.jwt_expiry_hours = i64::MAX as u64;
        assert!(Claims::for_user(&student(), &security).is_err());
    }
}
