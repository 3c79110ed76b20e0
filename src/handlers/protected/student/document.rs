use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Extension,
};
use serde::Deserialize;

use crate::database::models::Document;
use crate::error::ApiError;
use crate::handlers::{parse_id, query_params};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::UploadRequest;
use crate::state::AppState;
use crate::types::DocumentKind;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub kind: DocumentKind,
    pub file_name: Option<String>,
}

/// GET /api/student/internships/:id/documents
pub async fn documents_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Document>> {
    let documents = state.service.own_documents(user.id, parse_id(&id)?).await?;
    Ok(ApiResponse::success(documents))
}

/// POST /api/student/internships/:id/documents?kind=OFFER_LETTER&fileName=offer.pdf
///
/// The request body is the raw file; its `Content-Type` is recorded as-is.
pub async fn documents_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Document> {
    let id = parse_id(&id)?;
    let query = query_params(query)?;
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Upload exceeds the request size limit")
        } else {
            ApiError::bad_request(rejection.body_text())
        }
    })?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let upload = UploadRequest {
        kind: query.kind,
        file_name: query.file_name.unwrap_or_else(|| query.kind.as_str().to_ascii_lowercase()),
        content_type,
        body: body.to_vec(),
    };

    let document = state.service.upload_document(user.id, id, upload).await?;
    Ok(ApiResponse::created(document))
}
