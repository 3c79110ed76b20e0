use axum::{extract::State, Extension};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::LoginResult;
use crate::state::AppState;

/// GET /api/auth/whoami
pub async fn whoami(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

/// PUT /api/auth/session/refresh - new token with a fresh expiry
pub async fn refresh(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<LoginResult> {
    let result = state.service.refresh(user.id).await?;
    tracing::info!("Refreshed session for {}", user.email);
    Ok(ApiResponse::success(result))
}
