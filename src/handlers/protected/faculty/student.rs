use axum::{
    extract::{Path, State},
    Extension,
};

use crate::api::StudentDetailView;
use crate::database::models::User;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// GET /api/faculty/students
pub async fn students_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<User>> {
    let students = state.service.mentored_students(user.id).await?;
    Ok(ApiResponse::success(students))
}

/// GET /api/faculty/students/:id - a mentee with their internships
pub async fn student_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StudentDetailView> {
    let detail = state.service.mentored_student(user.id, parse_id(&id)?).await?;
    Ok(ApiResponse::success(detail.into()))
}
