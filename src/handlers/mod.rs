// handlers/mod.rs - 3-tier handler layout
//
// Public (no auth) → Protected (JWT + per-role guard) → Elevated (principal only)

pub mod elevated;
pub mod protected;
pub mod public;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id, answering 400 with the JSON envelope instead of axum's text rejection
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("'{}' is not a valid id", raw)))
}

/// Oversized bodies keep their 413; every other rejection is a 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("Request body exceeds the size limit")
        } else {
            ApiError::bad_request(rejection.body_text())
        }
    })
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
