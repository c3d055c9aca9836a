//! # List Client
//!
//! The handle pages use to drive a [`ListController`](crate::framework::ListController).

use crate::framework::error::ListError;
use crate::framework::filter::{FilterState, SortDirection};
use crate::framework::message::ListRequest;
use crate::framework::resource::Resource;
use crate::framework::view::ListView;
use tokio::sync::{mpsc, oneshot, watch};

/// A type-safe handle to one list page's controller.
///
/// * **Cloneable** – holds a sender and a view receiver, so cloning is cheap.
/// * **Async API** – every operation resolves to `Result<…, ListError>`.
/// * **Observable** – [`ListClient::subscribe`] yields every published [`ListView`].
#[derive(Clone)]
pub struct ListClient<T: Resource> {
    sender: mpsc::Sender<ListRequest<T>>,
    view: watch::Receiver<ListView<T>>,
}

impl<T: Resource> ListClient<T> {
    pub fn new(sender: mpsc::Sender<ListRequest<T>>, view: watch::Receiver<ListView<T>>) -> Self {
        Self { sender, view }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, ListError>>) -> ListRequest<T>,
    ) -> Result<R, ListError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ListError::ControllerClosed)?;
        response.await.map_err(|_| ListError::ControllerDropped)?
    }

    /// Reloads with the current filters.
    pub async fn load(&self) -> Result<Vec<T>, ListError> {
        self.request(|respond_to| ListRequest::Load { filters: None, respond_to }).await
    }

    /// Replaces the filters wholesale, then loads.
    pub async fn load_with(&self, filters: FilterState) -> Result<Vec<T>, ListError> {
        self.request(|respond_to| ListRequest::Load { filters: Some(filters), respond_to })
            .await
    }

    /// Alias of [`ListClient::load`] for refresh buttons.
    pub async fn refresh(&self) -> Result<Vec<T>, ListError> {
        self.load().await
    }

    /// Sets one filter (empty clears it), resets to the first page, and loads.
    pub async fn apply_filter(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Vec<T>, ListError> {
        let (name, value) = (name.into(), value.into());
        self.request(|respond_to| ListRequest::ApplyFilter { name, value, respond_to })
            .await
    }

    pub async fn set_page(&self, page: u32) -> Result<Vec<T>, ListError> {
        self.request(|respond_to| ListRequest::SetPage { page, respond_to }).await
    }

    pub async fn set_sort(
        &self,
        field: impl Into<String>,
        direction: SortDirection,
    ) -> Result<Vec<T>, ListError> {
        let field = field.into();
        self.request(|respond_to| ListRequest::SetSort { field, direction, respond_to })
            .await
    }

    /// Drops every named filter and the sort order, then loads the first page.
    pub async fn clear_filters(&self) -> Result<Vec<T>, ListError> {
        let mut filters = self.view().filters;
        filters.reset();
        self.load_with(filters).await
    }

    /// Fetches one record without touching the collection.
    pub async fn get(&self, id: T::Id) -> Result<T, ListError> {
        self.request(|respond_to| ListRequest::Get { id, respond_to }).await
    }

    /// Sends a create. For resources that reload after a create, that reload
    /// supersedes any load still in flight: its caller gets
    /// [`ListError::Superseded`] while the view settles on the reload, which
    /// uses the same filters.
    pub async fn create(&self, input: T::Create) -> Result<T, ListError> {
        self.request(|respond_to| ListRequest::Create { input, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, input: T::Update) -> Result<T, ListError> {
        self.request(|respond_to| ListRequest::Update { id, input, respond_to }).await
    }

    /// Marks a record for deletion and returns it for the confirmation dialog.
    pub async fn request_delete(&self, id: T::Id) -> Result<T, ListError> {
        self.request(|respond_to| ListRequest::RequestDelete { id, respond_to }).await
    }

    pub async fn cancel_delete(&self) -> Result<(), ListError> {
        self.request(|respond_to| ListRequest::CancelDelete { respond_to }).await
    }

    /// Sends the DELETE for the record marked by [`ListClient::request_delete`].
    pub async fn confirm_delete(&self) -> Result<(), ListError> {
        self.request(|respond_to| ListRequest::ConfirmDelete { respond_to }).await
    }

    pub async fn dismiss_notice(&self) -> Result<(), ListError> {
        self.sender
            .send(ListRequest::DismissNotice)
            .await
            .map_err(|_| ListError::ControllerClosed)
    }

    /// The most recently published view.
    pub fn view(&self) -> ListView<T> {
        self.view.borrow().clone()
    }

    /// A receiver notified on every published view.
    pub fn subscribe(&self) -> watch::Receiver<ListView<T>> {
        self.view.clone()
    }
}
