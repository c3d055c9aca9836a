//! # App Store Actor
//!
//! Owns the [`AppState`] and applies [`StoreAction`]s one at a time. Every
//! change is published on a watch channel and written back to storage.
//!
//! The store also listens for [`SessionEvent::Expired`] from the HTTP layer
//! and applies it as a logout, so a rejected token is reflected in the app
//! state without the caller doing anything.

use crate::http::session::{SessionEvent, PERSIST_KEY, TOKEN_KEY};
use crate::store::error::StoreError;
use crate::store::state::{reduce, rehydrate, snapshot, AppState, CartItem, StoreAction, UserProfile};
use crate::store::storage::KeyValueStorage;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest {
    Dispatch {
        action: StoreAction,
        respond_to: Response<AppState>,
    },
}

pub struct AppStore {
    receiver: mpsc::Receiver<StoreRequest>,
    storage: Arc<dyn KeyValueStorage>,
    state: watch::Sender<AppState>,
}

impl AppStore {
    /// Rehydrates from `storage` and returns the store with its client.
    pub fn new(storage: Arc<dyn KeyValueStorage>, buffer_size: usize) -> (Self, StoreClient) {
        let initial = match storage.get(PERSIST_KEY) {
            Some(blob) => rehydrate(&blob).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable persisted state");
                AppState::default()
            }),
            None => AppState::default(),
        };
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (state, view) = watch::channel(initial);
        let store = Self {
            receiver,
            storage,
            state,
        };
        (store, StoreClient { sender, view })
    }

    /// Runs until every [`StoreClient`] is dropped.
    pub async fn run(mut self, mut session_events: broadcast::Receiver<SessionEvent>) {
        info!("App store started");
        let mut listening = true;
        loop {
            tokio::select! {
                request = self.receiver.recv() => {
                    let Some(StoreRequest::Dispatch { action, respond_to }) = request else {
                        break;
                    };
                    let result = self.apply(action);
                    let _ = respond_to.send(result);
                }
                event = session_events.recv(), if listening => match event {
                    Ok(SessionEvent::Expired) => {
                        info!("Session expired, logging out");
                        if let Err(e) = self.apply(StoreAction::Logout) {
                            warn!(error = %e, "Failed to persist logout");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Missed session events");
                    }
                    Err(broadcast::error::RecvError::Closed) => listening = false,
                }
            }
        }
        info!("App store shutting down");
    }

    /// Reduces, publishes, then persists. The state is published even when
    /// persisting fails.
    fn apply(&mut self, action: StoreAction) -> Result<AppState, StoreError> {
        debug!(?action, "Applying action");
        let login_token = match &action {
            StoreAction::LoginSucceeded { token, .. } => Some(token.clone()),
            _ => None,
        };
        let is_logout = matches!(action, StoreAction::Logout);

        let next = reduce(&self.state.borrow(), action);
        self.state.send_replace(next.clone());

        self.storage.set(PERSIST_KEY, &snapshot(&next)?)?;
        if let Some(token) = login_token {
            self.storage.set(TOKEN_KEY, &token)?;
        } else if is_logout {
            self.storage.remove(TOKEN_KEY)?;
        }
        Ok(next)
    }
}

/// Handle to the [`AppStore`]. Cheap to clone.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
    view: watch::Receiver<AppState>,
}

impl StoreClient {
    /// Applies `action` and returns the resulting state.
    pub async fn dispatch(&self, action: StoreAction) -> Result<AppState, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Dispatch { action, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// The latest published state.
    pub fn state(&self) -> AppState {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.view.clone()
    }

    pub async fn login(&self, token: impl Into<String>, user: UserProfile) -> Result<AppState, StoreError> {
        self.dispatch(StoreAction::LoginSucceeded {
            token: token.into(),
            user,
        })
        .await
    }

    pub async fn logout(&self) -> Result<AppState, StoreError> {
        self.dispatch(StoreAction::Logout).await
    }

    pub async fn add_to_cart(&self, item: CartItem) -> Result<AppState, StoreError> {
        self.dispatch(StoreAction::AddToCart(item)).await
    }

    pub async fn set_quantity(
        &self,
        product_id: u64,
        variation_id: Option<u64>,
        quantity: u32,
    ) -> Result<AppState, StoreError> {
        self.dispatch(StoreAction::SetQuantity {
            product_id,
            variation_id,
            quantity,
        })
        .await
    }

    pub async fn remove_from_cart(&self, product_id: u64, variation_id: Option<u64>) -> Result<AppState, StoreError> {
        self.dispatch(StoreAction::RemoveFromCart {
            product_id,
            variation_id,
        })
        .await
    }

    pub async fn clear_cart(&self) -> Result<AppState, StoreError> {
        self.dispatch(StoreAction::ClearCart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::session::Session;
    use crate::store::storage::MemoryStorage;

    fn user() -> UserProfile {
        UserProfile {
            id: 7,
            name: "Grace".into(),
            email: "grace@example.com".into(),
            role: Some("admin".into()),
        }
    }

    fn spawn_store(storage: Arc<MemoryStorage>) -> (StoreClient, Session) {
        let session = Session::new(storage.clone());
        let (store, client) = AppStore::new(storage, 8);
        tokio::spawn(store.run(session.subscribe()));
        (client, session)
    }

    #[tokio::test]
    async fn test_login_persists_token_for_the_session() {
        let storage = Arc::new(MemoryStorage::new());
        let (client, session) = spawn_store(storage.clone());

        client.login("abc", user()).await.unwrap();

        assert_eq!(session.token().as_deref(), Some("abc"));
        assert!(client.state().auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_state_is_rehydrated_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let (client, _) = spawn_store(storage.clone());
            client
                .add_to_cart(CartItem {
                    product_id: 1,
                    variation_id: None,
                    name: "Recliner".into(),
                    unit_price: 899.0,
                    quantity: 2,
                })
                .await
                .unwrap();
        }

        let (store, client) = AppStore::new(storage, 8);
        drop(store);
        assert_eq!(client.state().cart.item_count(), 2);
    }

    #[tokio::test]
    async fn test_session_expiry_logs_out() {
        let storage = Arc::new(MemoryStorage::new());
        let (client, session) = spawn_store(storage.clone());
        client.login("abc", user()).await.unwrap();
        let mut view = client.subscribe();
        view.borrow_and_update();

        session.expire();
        view.changed().await.unwrap();

        assert!(!view.borrow().auth.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_is_closed() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, client) = AppStore::new(storage, 8);
        drop(store);
        assert_eq!(client.clear_cart().await.unwrap_err(), StoreError::StoreClosed);
    }
}
