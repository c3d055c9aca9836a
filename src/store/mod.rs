//! Client-side app state: auth and cart, plus the key-value storage it is
//! persisted to.

pub mod actor;
pub mod error;
pub mod state;
pub mod storage;

pub use actor::{AppStore, StoreClient};
pub use error::StoreError;
pub use state::{AppState, AuthState, CartItem, CartState, StoreAction, UserProfile};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
