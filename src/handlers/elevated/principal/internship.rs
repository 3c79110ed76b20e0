use axum::extract::{rejection::QueryRejection, Query, State};

use crate::api::{internship_views, InternshipView};
use crate::database::models::InternshipQuery;
use crate::handlers::query_params;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/principal/internships?phase=&reviewStatus=&limit=&offset=
pub async fn internships_get(
    State(state): State<AppState>,
    query: Result<Query<InternshipQuery>, QueryRejection>,
) -> ApiResult<Vec<InternshipView>> {
    let query = query_params(query)?;
    let internships = state.service.all_internships(query).await?;
    Ok(ApiResponse::success(internship_views(internships)))
}
