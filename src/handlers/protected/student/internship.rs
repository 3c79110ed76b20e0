use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::api::{internship_views, InternshipView};
use crate::database::models::{InternshipSubmission, InternshipUpdate};
use crate::handlers::{json_body, parse_id};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// GET /api/student/internships - the caller's own internships, newest first
pub async fn internships_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<InternshipView>> {
    let internships = state.service.own_internships(user.id).await?;
    Ok(ApiResponse::success(internship_views(internships)))
}

/// POST /api/student/internships
pub async fn internships_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<InternshipSubmission>, JsonRejection>,
) -> ApiResult<InternshipView> {
    let submission = json_body(payload)?;
    let internship = state.service.submit_internship(user.id, submission).await?;
    Ok(ApiResponse::created(internship.into()))
}

/// GET /api/student/internships/:id
pub async fn internship_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<InternshipView> {
    let internship = state.service.own_internship(user.id, parse_id(&id)?).await?;
    Ok(ApiResponse::success(internship.into()))
}

/// PATCH /api/student/internships/:id
pub async fn internship_patch(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<InternshipUpdate>, JsonRejection>,
) -> ApiResult<InternshipView> {
    let id = parse_id(&id)?;
    let update = json_body(payload)?;
    let internship = state.service.update_own_internship(user.id, id, update).await?;
    Ok(ApiResponse::success(internship.into()))
}
