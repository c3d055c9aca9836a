//! # Controller Messages
//!
//! Requests sent from a [`ListClient`](crate::framework::ListClient) to its
//! [`ListController`](crate::framework::ListController), and the completions
//! that network tasks feed back into the controller loop.

use crate::framework::envelope::PageMeta;
use crate::framework::error::ListError;
use crate::framework::filter::{FilterState, SortDirection};
use crate::framework::resource::Resource;
use crate::http::ApiError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by controllers.
pub type Response<T> = oneshot::Sender<Result<T, ListError>>;

/// The operations of a list page.
///
/// Load-type requests (`Load`, `ApplyFilter`, `SetPage`, `SetSort`) all answer
/// with the freshly loaded collection.
#[derive(Debug)]
pub enum ListRequest<T: Resource> {
    Load {
        filters: Option<FilterState>,
        respond_to: Response<Vec<T>>,
    },
    ApplyFilter {
        name: String,
        value: String,
        respond_to: Response<Vec<T>>,
    },
    SetPage {
        page: u32,
        respond_to: Response<Vec<T>>,
    },
    SetSort {
        field: String,
        direction: SortDirection,
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<T>,
    },
    Create {
        input: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        input: T::Update,
        respond_to: Response<T>,
    },
    RequestDelete {
        id: T::Id,
        respond_to: Response<T>,
    },
    CancelDelete {
        respond_to: Response<()>,
    },
    ConfirmDelete {
        respond_to: Response<()>,
    },
    DismissNotice,
}

/// Result of a network task, processed back on the controller loop.
#[derive(Debug)]
pub(crate) enum Completion<T: Resource> {
    Loaded {
        generation: u64,
        result: Result<(Vec<T>, Option<PageMeta>), ApiError>,
        respond_to: Response<Vec<T>>,
    },
    Created {
        result: Result<T, ApiError>,
        respond_to: Response<T>,
    },
    Updated {
        result: Result<T, ApiError>,
        respond_to: Response<T>,
    },
    Deleted {
        id: T::Id,
        result: Result<(), ApiError>,
        respond_to: Response<()>,
    },
}
