//! # API Errors
//!
//! Classification of transport failures and non-2xx responses. Status codes
//! are inspected directly; message bodies are only read for display text.

use crate::framework::view::{GENERIC_ERROR_MESSAGE, LOGIN_REQUIRED_MESSAGE};
use crate::framework::FieldErrors;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::http::ApiClient).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// 401. Stored credentials have already been cleared.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// 404.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// 422 with per-field messages.
    #[error("Validation failed: {message}")]
    Validation { message: String, fields: FieldErrors },

    /// Any other non-2xx status.
    #[error("Server error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Reads `message` (or `error`) from a JSON error body.
fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

impl ApiError {
    /// Classifies a non-2xx response.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let json: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let message = server_message(&json);
        match status {
            401 => ApiError::Unauthorized {
                message: message.unwrap_or_else(|| "Unauthorized".to_string()),
            },
            404 => ApiError::NotFound {
                message: message.unwrap_or_else(|| "Not found".to_string()),
            },
            422 => match FieldErrors::from_server(&json) {
                Some(fields) => ApiError::Validation {
                    message: message.unwrap_or_else(|| fields.to_string()),
                    fields,
                },
                None => ApiError::Server { status, message },
            },
            _ => ApiError::Server { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Validation { .. } => Some(422),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text shown to the user. Authentication failures always get the fixed
    /// login message, never the raw server text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => LOGIN_REQUIRED_MESSAGE.to_string(),
            ApiError::NotFound { message } | ApiError::Validation { message, .. } => message.clone(),
            ApiError::Server { message: Some(message), .. } => message.clone(),
            ApiError::Server { message: None, .. } | ApiError::Network(_) | ApiError::Decode(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}
