//! # Observability & Tracing
//!
//! [`setup_tracing`] installs structured logging for the whole console.
//!
//! The format is compact and hides the module prefix (`with_target(false)`);
//! every controller log line carries a `resource` field instead, so lines of
//! different pages stay apart without long module paths.
//!
//! ## Usage
//!
//! ```bash
//! # Lifecycle and completed loads/mutations
//! RUST_LOG=info cargo run
//!
//! # Query parameters, payloads and discarded stale responses
//! RUST_LOG=debug cargo run
//!
//! # Only the HTTP layer
//! RUST_LOG=seating_console::http=debug cargo run
//! ```
//!
//! ## What a load looks like
//!
//! With `RUST_LOG=debug` a filter change followed by a quicker second one
//! reads:
//!
//! ```text
//! DEBUG Apply filter resource="Order" name="status" value="pending"
//! DEBUG Load resource="Order" generation=2 query=[("page", "1"), ("per_page", "10"), ("status", "pending")]
//! DEBUG Apply filter resource="Order" name="status" value="shipped"
//! DEBUG Load resource="Order" generation=3 query=[...]
//! INFO Loaded resource="Order" generation=3 size=4
//! DEBUG Discarding stale response resource="Order" generation=2 latest=3
//! ```
//!
//! Request spans (`execute{method=GET path=/orders}`) come from
//! [`ApiClient::execute`](crate::http::ApiClient::execute). Tokens and
//! passwords are never recorded.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // resource fields identify the page
        .compact()
        .init();
}
