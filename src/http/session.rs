//! # Session
//!
//! Where the bearer token comes from and what happens when the server
//! rejects it.
//!
//! The token is looked up in two places, in order:
//! 1. the direct [`TOKEN_KEY`] entry;
//! 2. `auth.token` inside the persisted app-state blob under [`PERSIST_KEY`]
//!    (each slice of that blob is itself a JSON string).
//!
//! A 401 clears both and broadcasts [`SessionEvent::Expired`]. Nothing is
//! redirected from here; whoever renders the app reacts to the logged-out
//! state.

use crate::store::KeyValueStorage;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

pub const TOKEN_KEY: &str = "token";
pub const PERSIST_KEY: &str = "persist:root";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The server answered 401 and the stored credentials were cleared.
    Expired,
}

/// Reads `auth.token` from a persisted blob. `auth` may be a JSON string
/// (redux-persist layout) or an inline object.
fn persisted_token(blob: &str) -> Option<String> {
    let root: Value = serde_json::from_str(blob).ok()?;
    let auth = match root.get("auth")? {
        Value::String(raw) => serde_json::from_str::<Value>(raw).ok()?,
        other => other.clone(),
    };
    auth.get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn KeyValueStorage>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { storage, events }
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        self.storage.clone()
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .or_else(|| self.storage.get(PERSIST_KEY).as_deref().and_then(persisted_token))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Removes the token from both locations.
    pub fn clear_credentials(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %e, "Failed to remove stored token");
        }
        let Some(blob) = self.storage.get(PERSIST_KEY) else {
            return;
        };
        let Ok(Value::Object(mut root)) = serde_json::from_str::<Value>(&blob) else {
            return;
        };
        if root.contains_key("auth") {
            root.insert(
                "auth".to_string(),
                Value::String(json!({"token": null, "user": null}).to_string()),
            );
            if let Err(e) = self.storage.set(PERSIST_KEY, &Value::Object(root).to_string()) {
                warn!(error = %e, "Failed to rewrite persisted auth state");
            }
        }
    }

    /// Clears credentials and tells subscribers the session is gone.
    pub fn expire(&self) {
        self.clear_credentials();
        // No subscribers is fine: nothing is listening yet.
        let _ = self.events.send(SessionEvent::Expired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    fn session() -> (Session, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (Session::new(storage.clone()), storage)
    }

    #[test]
    fn test_direct_key_wins_over_persisted_blob() {
        let (session, storage) = session();
        storage
            .set(PERSIST_KEY, &json!({"auth": json!({"token": "from-blob"}).to_string()}).to_string())
            .unwrap();
        assert_eq!(session.token().as_deref(), Some("from-blob"));

        storage.set(TOKEN_KEY, "direct").unwrap();
        assert_eq!(session.token().as_deref(), Some("direct"));
    }

    #[test]
    fn test_inline_auth_object_is_accepted() {
        let (session, storage) = session();
        storage
            .set(PERSIST_KEY, r#"{"auth":{"token":"inline"}}"#)
            .unwrap();
        assert_eq!(session.token().as_deref(), Some("inline"));
    }

    #[tokio::test]
    async fn test_expire_clears_both_locations_and_notifies() {
        let (session, storage) = session();
        storage.set(TOKEN_KEY, "direct").unwrap();
        storage
            .set(
                PERSIST_KEY,
                &json!({
                    "auth": json!({"token": "blob"}).to_string(),
                    "cart": json!({"items": []}).to_string(),
                })
                .to_string(),
            )
            .unwrap();
        let mut events = session.subscribe();

        session.expire();

        assert_eq!(session.token(), None);
        let blob: Value = serde_json::from_str(&storage.get(PERSIST_KEY).unwrap()).unwrap();
        assert!(blob.get("cart").is_some());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
    }
}
