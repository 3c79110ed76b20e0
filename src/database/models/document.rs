use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::DocumentKind;

/// Metadata for a file uploaded against an internship. The bytes live on disk
/// under the configured upload directory; only `storage_path` points at them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub internship_id: Uuid,
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
    #[serde(skip)]
    pub storage_path: String,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
}
