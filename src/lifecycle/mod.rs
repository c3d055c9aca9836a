//! Orchestration: configuration, tracing, and the [`Console`] that starts
//! and stops every controller.

pub mod config;
pub mod console;
pub mod tracing;

pub use config::{ApiConfig, ConfigError, ConsoleConfig, ListConfig, StorageConfig};
pub use console::{Console, ConsoleError};
pub use self::tracing::setup_tracing;
