//! # View State
//!
//! What a list page renders. [`ListView`] is published by the controller on
//! every state change; [`UiState`] is derived from the controller's fields and
//! never stored on its own.

use crate::framework::envelope::PageMeta;
use crate::framework::filter::FilterState;
use crate::http::ApiError;

/// Banner text for authentication failures.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to continue.";

/// Banner text when the server gave no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerKind {
    LoginRequired,
    /// Rendered as a dedicated page with a single way back to the list.
    NotFound { back_to: String },
    Generic,
}

/// Error shown in place of a list or detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub kind: BannerKind,
    pub message: String,
}

impl ErrorBanner {
    /// Builds the banner for `err`. `list_route` is the recovery target of
    /// not-found pages.
    pub fn from_api(err: &ApiError, list_route: &str) -> Self {
        let kind = match err {
            ApiError::Unauthorized { .. } => BannerKind::LoginRequired,
            ApiError::NotFound { .. } => BannerKind::NotFound {
                back_to: list_route.to_string(),
            },
            _ => BannerKind::Generic,
        };
        Self {
            kind,
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient notification shown after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Render state of a list page.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T> {
    /// Nothing requested yet.
    Idle,
    /// A replacing load is in flight. No items are exposed.
    Loading,
    Error(ErrorBanner),
    Empty,
    Populated(Vec<T>),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn items(&self) -> &[T] {
        match self {
            UiState::Populated(items) => items,
            _ => &[],
        }
    }

    pub fn banner(&self) -> Option<&ErrorBanner> {
        match self {
            UiState::Error(banner) => Some(banner),
            _ => None,
        }
    }
}

/// A delete awaiting confirmation or completion.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation<T> {
    pub target: T,
    /// Set once the user confirmed; controls stay disabled until the server answers.
    pub in_flight: bool,
}

/// Snapshot of one list page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub state: UiState<T>,
    pub filters: FilterState,
    pub pending: Option<PendingMutation<T>>,
    pub notice: Option<Notice>,
    pub page_meta: Option<PageMeta>,
}

impl<T> ListView<T> {
    pub fn new(filters: FilterState) -> Self {
        Self {
            state: UiState::Idle,
            filters,
            pending: None,
            notice: None,
            page_meta: None,
        }
    }

    pub fn items(&self) -> &[T] {
        self.state.items()
    }
}
