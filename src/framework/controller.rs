//! # List Controller
//!
//! This module defines the `ListController`, the component that owns the
//! client-side state of one list page: the collection, the filters, the
//! pending delete, the latest notice, and the load generation.
//!
//! ## Concurrency model
//! The controller is an actor. Requests arrive on an mpsc channel and are
//! handled one at a time, so the list state has a single writer and needs no
//! locks. Network calls run in spawned tasks; their results come back on an
//! internal channel and are applied on the same loop. The loop keeps
//! answering (and publishing view updates) while requests are in flight.
//!
//! ## Stale responses
//! Every load is stamped with a generation. Only the completion of the newest
//! load may replace the collection; older completions are answered with
//! [`ListError::Superseded`] and otherwise ignored.
//!
//! ## Mutations
//! Local patches are applied only after the server confirmed the mutation,
//! so a failure never needs a rollback.

use crate::framework::client::ListClient;
use crate::framework::envelope::{self, PageMeta};
use crate::framework::error::ListError;
use crate::framework::filter::FilterState;
use crate::framework::message::{Completion, ListRequest, Response};
use crate::framework::resource::{PatchPolicy, Resource};
use crate::framework::view::{ErrorBanner, ListView, Notice, PendingMutation, UiState};
use crate::http::{ApiClient, ApiError, Method, MultipartForm};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// The actor that manages one list page.
///
/// # Usage Pattern
///
/// 1. **Create**: `ListController::new()` returns the controller and its client.
/// 2. **Wire**: pass the [`ApiClient`] into `controller.run(api)`.
/// 3. **Run**: spawn the run loop; talk to it through the [`ListClient`].
///
/// ```rust,ignore
/// let (controller, colors) = ListController::<Color>::new(32);
/// tokio::spawn(controller.run(api.clone()));
/// colors.apply_filter("search", "walnut").await?;
/// ```
pub struct ListController<T: Resource> {
    receiver: mpsc::Receiver<ListRequest<T>>,
    completions_tx: mpsc::UnboundedSender<Completion<T>>,
    completions: mpsc::UnboundedReceiver<Completion<T>>,
    view: watch::Sender<ListView<T>>,
    collection: Vec<T>,
    filters: FilterState,
    generation: u64,
    loading: bool,
    loaded: bool,
    error: Option<ErrorBanner>,
    pending: Option<PendingMutation<T>>,
    notice: Option<Notice>,
    page_meta: Option<PageMeta>,
}

impl<T: Resource> ListController<T> {
    /// Creates a controller with the resource's default filters.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait
    /// when it is full.
    pub fn new(buffer_size: usize) -> (Self, ListClient<T>) {
        Self::with_filters(buffer_size, T::default_filters())
    }

    /// Creates a controller starting from `filters`.
    pub fn with_filters(buffer_size: usize, filters: FilterState) -> (Self, ListClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (view, view_rx) = watch::channel(ListView::new(filters.clone()));
        let controller = Self {
            receiver,
            completions_tx,
            completions,
            view,
            collection: Vec::new(),
            filters,
            generation: 0,
            loading: false,
            loaded: false,
            error: None,
            pending: None,
            notice: None,
            page_meta: None,
        };
        (controller, ListClient::new(sender, view_rx))
    }

    /// Runs the controller loop until every client is dropped.
    ///
    /// # Context Injection
    /// The `api` client is injected here rather than in `new()`, so the
    /// controllers of a console can be created before the transport is wired.
    pub async fn run(mut self, api: ApiClient) {
        let resource = T::LABEL;
        info!(resource, "Controller started");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(request) => self.handle_request(request, &api),
                    None => break,
                },
                Some(done) = self.completions.recv() => self.handle_completion(done, &api),
            }
        }

        info!(resource, size = self.collection.len(), "Shutdown");
    }

    fn handle_request(&mut self, request: ListRequest<T>, api: &ApiClient) {
        let resource = T::LABEL;
        match request {
            ListRequest::Load { filters, respond_to } => {
                if let Some(filters) = filters {
                    self.filters = filters;
                }
                self.start_load(api, respond_to);
            }
            ListRequest::ApplyFilter { name, value, respond_to } => {
                debug!(resource, %name, %value, "Apply filter");
                self.filters.apply(name, value);
                self.start_load(api, respond_to);
            }
            ListRequest::SetPage { page, respond_to } => {
                self.filters.set_page(page);
                self.start_load(api, respond_to);
            }
            ListRequest::SetSort { field, direction, respond_to } => {
                self.filters.set_sort(field, direction);
                self.start_load(api, respond_to);
            }
            ListRequest::Get { id, respond_to } => {
                debug!(resource, %id, "Get");
                let api = api.clone();
                tokio::spawn(async move {
                    let result = fetch_one::<T>(&api, &id).await.map_err(ListError::from);
                    let _ = respond_to.send(result);
                });
            }
            ListRequest::Create { input, respond_to } => {
                debug!(resource, ?input, "Create");
                if let Err(fields) = T::validate_create(&input) {
                    warn!(resource, %fields, "Create rejected by validation");
                    let _ = respond_to.send(Err(ListError::Validation(fields)));
                    return;
                }
                let api = api.clone();
                let done = self.completions_tx.clone();
                tokio::spawn(async move {
                    let result = send_create::<T>(&api, input).await;
                    let _ = done.send(Completion::Created { result, respond_to });
                });
            }
            ListRequest::Update { id, input, respond_to } => {
                debug!(resource, %id, ?input, "Update");
                if let Err(fields) = T::validate_update(&input) {
                    warn!(resource, %id, %fields, "Update rejected by validation");
                    let _ = respond_to.send(Err(ListError::Validation(fields)));
                    return;
                }
                let api = api.clone();
                let done = self.completions_tx.clone();
                tokio::spawn(async move {
                    let result = send_update::<T>(&api, &id, input).await;
                    let _ = done.send(Completion::Updated { result, respond_to });
                });
            }
            ListRequest::RequestDelete { id, respond_to } => {
                if self.delete_in_flight() {
                    let _ = respond_to.send(Err(ListError::MutationInFlight));
                    return;
                }
                if !self.showing_collection() {
                    debug!(resource, %id, "Delete requested while the list is hidden");
                    let _ = respond_to.send(Err(ListError::UnknownItem(id.to_string())));
                    return;
                }
                match self.collection.iter().find(|item| item.id() == &id) {
                    Some(target) => {
                        debug!(resource, %id, "Delete requested");
                        let target = target.clone();
                        self.pending = Some(PendingMutation { target: target.clone(), in_flight: false });
                        self.publish();
                        let _ = respond_to.send(Ok(target));
                    }
                    None => {
                        let _ = respond_to.send(Err(ListError::UnknownItem(id.to_string())));
                    }
                }
            }
            ListRequest::CancelDelete { respond_to } => {
                if self.delete_in_flight() {
                    let _ = respond_to.send(Err(ListError::MutationInFlight));
                    return;
                }
                self.pending = None;
                self.publish();
                let _ = respond_to.send(Ok(()));
            }
            ListRequest::ConfirmDelete { respond_to } => {
                let Some(pending) = self.pending.as_mut() else {
                    let _ = respond_to.send(Err(ListError::NoPendingMutation));
                    return;
                };
                if pending.in_flight {
                    let _ = respond_to.send(Err(ListError::MutationInFlight));
                    return;
                }
                pending.in_flight = true;
                let id = pending.target.id().clone();
                debug!(resource, %id, "Delete confirmed");
                self.publish();

                let api = api.clone();
                let done = self.completions_tx.clone();
                tokio::spawn(async move {
                    let result = api.delete(&T::item_path(&id)).await;
                    let _ = done.send(Completion::Deleted { id, result, respond_to });
                });
            }
            ListRequest::DismissNotice => {
                self.notice = None;
                self.publish();
            }
        }
    }

    fn handle_completion(&mut self, done: Completion<T>, api: &ApiClient) {
        let resource = T::LABEL;
        match done {
            Completion::Loaded { generation, result, respond_to } => {
                if generation != self.generation {
                    debug!(resource, generation, latest = self.generation, "Discarding stale response");
                    let _ = respond_to.send(Err(ListError::Superseded { generation }));
                    return;
                }
                self.loading = false;
                self.loaded = true;
                match result {
                    Ok((items, page_meta)) => {
                        info!(resource, generation, size = items.len(), "Loaded");
                        self.collection = items;
                        self.page_meta = page_meta;
                        self.error = None;
                        self.publish();
                        let _ = respond_to.send(Ok(self.collection.clone()));
                    }
                    Err(e) => {
                        warn!(resource, generation, error = %e, "Load failed");
                        self.error = Some(ErrorBanner::from_api(&e, T::PATH));
                        self.publish();
                        let _ = respond_to.send(Err(ListError::Api(e)));
                    }
                }
            }
            Completion::Created { result, respond_to } => match result {
                Ok(item) => {
                    info!(resource, id = %item.id(), "Created");
                    self.notice = Some(Notice::success(format!("{} created successfully", T::LABEL)));
                    match T::AFTER_CREATE {
                        PatchPolicy::Patch => {
                            self.upsert(item.clone());
                            self.publish();
                        }
                        PatchPolicy::Reload => {
                            let (reload_to, _) = oneshot::channel();
                            self.start_load(api, reload_to);
                        }
                    }
                    let _ = respond_to.send(Ok(item));
                }
                Err(e) => {
                    warn!(resource, error = %e, "Create failed");
                    self.notice = Some(Notice::error(e.user_message()));
                    self.publish();
                    let _ = respond_to.send(Err(ListError::Api(e)));
                }
            },
            Completion::Updated { result, respond_to } => match result {
                Ok(item) => {
                    info!(resource, id = %item.id(), "Updated");
                    self.upsert(item.clone());
                    self.notice = Some(Notice::success(format!("{} updated successfully", T::LABEL)));
                    self.publish();
                    let _ = respond_to.send(Ok(item));
                }
                Err(e) => {
                    warn!(resource, error = %e, "Update failed");
                    self.notice = Some(Notice::error(e.user_message()));
                    self.publish();
                    let _ = respond_to.send(Err(ListError::Api(e)));
                }
            },
            Completion::Deleted { id, result, respond_to } => {
                self.pending = None;
                match result {
                    Ok(()) => {
                        self.collection.retain(|item| item.id() != &id);
                        info!(resource, %id, size = self.collection.len(), "Deleted");
                        self.notice = Some(Notice::success(format!("{} deleted successfully", T::LABEL)));
                        self.publish();
                        let _ = respond_to.send(Ok(()));
                    }
                    Err(e) => {
                        warn!(resource, %id, error = %e, "Delete failed");
                        self.notice = Some(Notice::error(e.user_message()));
                        self.publish();
                        let _ = respond_to.send(Err(ListError::Api(e)));
                    }
                }
            }
        }
    }

    fn start_load(&mut self, api: &ApiClient, respond_to: Response<Vec<T>>) {
        self.generation += 1;
        let generation = self.generation;
        self.loading = true;
        self.error = None;
        self.publish();

        let query = self.filters.to_query();
        debug!(resource = T::LABEL, generation, ?query, "Load");
        let api = api.clone();
        let done = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = fetch_page::<T>(&api, query).await;
            let _ = done.send(Completion::Loaded { generation, result, respond_to });
        });
    }

    /// The collection is only addressable while the page renders it.
    fn showing_collection(&self) -> bool {
        self.loaded && !self.loading && self.error.is_none()
    }

    fn delete_in_flight(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.in_flight)
    }

    /// Replaces the record with the same id, or appends it.
    fn upsert(&mut self, item: T) {
        match self.collection.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.collection.push(item),
        }
    }

    fn ui_state(&self) -> UiState<T> {
        if self.loading {
            UiState::Loading
        } else if let Some(banner) = &self.error {
            UiState::Error(banner.clone())
        } else if !self.loaded {
            UiState::Idle
        } else if self.collection.is_empty() {
            UiState::Empty
        } else {
            UiState::Populated(self.collection.clone())
        }
    }

    fn publish(&self) {
        self.view.send_replace(ListView {
            state: self.ui_state(),
            filters: self.filters.clone(),
            pending: self.pending.clone(),
            notice: self.notice.clone(),
            page_meta: self.page_meta,
        });
    }
}

fn decode_single<T: Resource>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(envelope::single(body)).map_err(|e| ApiError::Decode(e.to_string()))
}

fn to_json<P: serde::Serialize>(payload: &P) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn fetch_page<T: Resource>(
    api: &ApiClient,
    query: Vec<(String, String)>,
) -> Result<(Vec<T>, Option<PageMeta>), ApiError> {
    let body = api.get_json(T::PATH, query).await?;
    let items = T::ENVELOPE
        .decode(&body)
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok((items, envelope::page_meta(&body)))
}

async fn fetch_one<T: Resource>(api: &ApiClient, id: &T::Id) -> Result<T, ApiError> {
    let body = api.get_json(&T::item_path(id), Vec::new()).await?;
    decode_single(body)
}

async fn send_create<T: Resource>(api: &ApiClient, input: T::Create) -> Result<T, ApiError> {
    let body = match T::create_upload(&input) {
        Some(upload) => {
            let form = MultipartForm::from_payload(&input, T::UPLOAD_FIELD, upload, None)?;
            api.send_multipart(T::PATH, form).await?
        }
        None => api.send_json(Method::Post, T::PATH, to_json(&input)?).await?,
    };
    decode_single(body)
}

/// Updates carrying an image are re-issued as multipart POST with a `PUT`
/// method override; everything else is a plain JSON PUT. A confirmation
/// without a body (204) is followed by a fetch of the record.
async fn send_update<T: Resource>(api: &ApiClient, id: &T::Id, input: T::Update) -> Result<T, ApiError> {
    let path = T::item_path(id);
    let body = match T::update_upload(&input) {
        Some(upload) => {
            let form = MultipartForm::from_payload(&input, T::UPLOAD_FIELD, upload, Some("PUT"))?;
            api.send_multipart(&path, form).await?
        }
        None => api.send_json(Method::Put, &path, to_json(&input)?).await?,
    };
    if body.is_null() {
        debug!(resource = T::LABEL, %id, "Update confirmed without a body, fetching");
        return fetch_one::<T>(api, id).await;
    }
    decode_single(body)
}
