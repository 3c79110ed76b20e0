use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::InstitutionDashboard;
use crate::state::AppState;

/// GET /api/principal/dashboard - institution-wide counts
pub async fn dashboard_get(State(state): State<AppState>) -> ApiResult<InstitutionDashboard> {
    let dashboard = state.service.principal_dashboard().await?;
    Ok(ApiResponse::success(dashboard))
}
