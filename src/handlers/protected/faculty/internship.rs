use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};

use crate::api::{internship_views, InternshipView};
use crate::database::models::{Document, InternshipQuery, PhaseChange, ReviewRequest};
use crate::handlers::{json_body, parse_id, query_params};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// GET /api/faculty/internships?phase=&reviewStatus=&limit=&offset=
pub async fn internships_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    query: Result<Query<InternshipQuery>, QueryRejection>,
) -> ApiResult<Vec<InternshipView>> {
    let query = query_params(query)?;
    let internships = state.service.faculty_internships(user.id, query).await?;
    Ok(ApiResponse::success(internship_views(internships)))
}

/// GET /api/faculty/internships/:id
pub async fn internship_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<InternshipView> {
    let internship = state.service.faculty_internship(user.id, parse_id(&id)?).await?;
    Ok(ApiResponse::success(internship.into()))
}

/// POST /api/faculty/internships/:id/review
pub async fn review_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<InternshipView> {
    let id = parse_id(&id)?;
    let review = json_body(payload)?;
    let internship = state.service.review_internship(user.id, id, review).await?;
    Ok(ApiResponse::success(internship.into()))
}

/// PATCH /api/faculty/internships/:id/phase
pub async fn phase_patch(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<PhaseChange>, JsonRejection>,
) -> ApiResult<InternshipView> {
    let id = parse_id(&id)?;
    let change = json_body(payload)?;
    let internship = state.service.update_phase(user.id, id, change).await?;
    Ok(ApiResponse::success(internship.into()))
}

/// GET /api/faculty/internships/:id/documents
pub async fn documents_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Document>> {
    let documents = state.service.faculty_documents(user.id, parse_id(&id)?).await?;
    Ok(ApiResponse::success(documents))
}
