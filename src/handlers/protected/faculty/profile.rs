use axum::{extract::State, Extension};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::FacultyDashboard;
use crate::state::AppState;

/// GET /api/faculty/profile
pub async fn profile_get(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

/// GET /api/faculty/dashboard - mentee and review counts
pub async fn dashboard_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<FacultyDashboard> {
    let dashboard = state.service.faculty_dashboard(user.id).await?;
    Ok(ApiResponse::success(dashboard))
}
