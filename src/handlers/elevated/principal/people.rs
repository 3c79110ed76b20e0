use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::User;
use crate::handlers::{json_body, parse_id};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorAssignment {
    pub mentor_id: Uuid,
}

/// GET /api/principal/faculty
pub async fn faculty_get(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let faculty = state.service.users_with_role(Role::Faculty).await?;
    Ok(ApiResponse::success(faculty))
}

/// GET /api/principal/students
pub async fn students_get(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let students = state.service.users_with_role(Role::Student).await?;
    Ok(ApiResponse::success(students))
}

/// PUT /api/principal/students/:id/mentor
pub async fn mentor_put(
    State(state): State<AppState>,
    Extension(CurrentUser(principal)): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<MentorAssignment>, JsonRejection>,
) -> ApiResult<User> {
    let student_id = parse_id(&id)?;
    let assignment = json_body(payload)?;
    let student = state.service.assign_mentor(student_id, assignment.mentor_id).await?;
    tracing::info!("Principal {} assigned mentor for {}", principal.email, student.email);
    Ok(ApiResponse::success(student))
}
