use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};

use crate::database::models::{ProfileUpdate, User};
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// GET /api/student/profile
pub async fn profile_get(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

/// PUT /api/student/profile
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<User> {
    let update = json_body(payload)?;
    let user = state.service.update_profile(user.id, update).await?;
    Ok(ApiResponse::success(user))
}
