use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::database::models::NewUser;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::LoginResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - exchange credentials for a JWT
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResult> {
    let request = json_body(payload)?;
    let result = state.service.login(&request.email, &request.password).await?;
    Ok(ApiResponse::success(result))
}

/// POST /auth/register - student self-registration
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<LoginResult> {
    let new_user = json_body(payload)?;
    let result = state.service.register_student(new_user).await?;
    Ok(ApiResponse::created(result))
}
