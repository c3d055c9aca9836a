//! # Controller Errors
//!
//! Everything a [`ListClient`](crate::framework::ListClient) call can fail with.
//! Network and status failures are wrapped from [`ApiError`]; the rest are
//! raised by the controller itself.

use crate::framework::validation::FieldErrors;
use crate::framework::view::ErrorBanner;
use crate::http::ApiError;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ListError {
    /// Client-side checks failed. Nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// A newer load was started before this one finished. Its result was dropped.
    #[error("Load {generation} superseded by a newer request")]
    Superseded { generation: u64 },

    /// The id is not part of the current collection.
    #[error("Item not in collection: {0}")]
    UnknownItem(String),

    /// `confirm_delete` without a preceding `request_delete`.
    #[error("No delete awaiting confirmation")]
    NoPendingMutation,

    /// A confirmed delete is still waiting for the server.
    #[error("A delete is already in flight")]
    MutationInFlight,

    #[error("Controller closed")]
    ControllerClosed,

    #[error("Controller dropped response channel")]
    ControllerDropped,
}

impl ListError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ListError::Validation(fields) => Some(fields),
            ListError::Api(ApiError::Validation { fields, .. }) => Some(fields),
            _ => None,
        }
    }

    /// Banner for detail pages. `None` for errors that are not page-level.
    pub fn banner(&self, list_route: &str) -> Option<ErrorBanner> {
        match self {
            ListError::Api(err) => Some(ErrorBanner::from_api(err, list_route)),
            _ => None,
        }
    }
}
