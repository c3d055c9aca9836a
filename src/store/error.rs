//! Error types for the app store.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Reading or writing persisted storage failed.
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// Persisted data could not be parsed or serialized.
    #[error("Corrupt persisted state: {0}")]
    Corrupt(String),

    #[error("Store closed")]
    StoreClosed,

    #[error("Store dropped response channel")]
    StoreDropped,
}
