//! # Exports
//!
//! Export endpoints return a binary file (spreadsheet, PDF). The bytes are
//! passed through untouched and saved under the name the server suggests.

use crate::http::transport::ApiResponse;
use std::path::{Path, PathBuf};

/// A downloaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Extracts `filename` from a `Content-Disposition` header value.
fn disposition_file_name(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Keeps only the final path component so a hostile header cannot escape the
/// target directory.
fn sanitize(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("export.bin")
        .to_string()
}

impl Export {
    pub fn from_response(response: ApiResponse, fallback_name: &str) -> Self {
        let file_name = response
            .content_disposition
            .as_deref()
            .and_then(disposition_file_name)
            .unwrap_or_else(|| fallback_name.to_string());
        Self {
            file_name: sanitize(&file_name),
            content_type: response.content_type,
            bytes: response.body,
        }
    }

    /// Writes the file into `dir` and returns its path.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}
