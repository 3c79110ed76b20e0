use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The stored user behind a validated token, injected for handlers
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware that re-checks the token's user against the store.
/// Deactivated accounts and tokens whose role no longer matches are refused.
pub async fn validate_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let user = state
        .service
        .store()
        .find_user(auth_user.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user {} ({})", auth_user.user_id, auth_user.email);
            ApiError::unauthorized("User no longer exists")
        })?;

    if !user.is_active {
        tracing::warn!("Deactivated user {} attempted access", user.email);
        return Err(ApiError::forbidden("User account is deactivated"));
    }

    if user.role != auth_user.role {
        tracing::warn!(
            "Role mismatch for {}: token says {}, store says {}",
            user.email,
            auth_user.role,
            user.role
        );
        return Err(ApiError::forbidden("User role has changed; please log in again"));
    }

    tracing::debug!("User validation successful: {} ({})", user.email, user.role);
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
