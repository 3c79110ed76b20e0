use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::types::DocumentKind;

const MAX_FILE_NAME_LEN: usize = 128;

/// A document upload as received from the student route
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Writes uploaded document bytes under `<root>/<internship_id>/<document_id>`
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(root: PathBuf, max_bytes: usize) -> Self {
        Self { root, max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save(&self, internship_id: Uuid, document_id: Uuid, body: &[u8]) -> std::io::Result<PathBuf> {
        let dir = self.root.join(internship_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(document_id.to_string());
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}

pub fn checksum(body: &[u8]) -> String {
    format!("{:x}", Sha256::digest(body))
}

/// Keep only characters that are safe in a download header, and never a path
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .take(MAX_FILE_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
