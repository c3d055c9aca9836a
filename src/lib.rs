//! # Seating Console
//!
//! > **The client side of a furniture admin console, as resource-oriented actors.**
//!
//! Every admin page (arm types, colors, products, variations, price tiers,
//! customers, orders, ...) runs the same cycle: fetch a filtered page of
//! records, show it, and apply confirmed mutations to it. This crate writes
//! that cycle once, as a generic actor, and makes each page a short
//! description of its endpoint.
//!
//! ## Core Concepts
//!
//! ### Generics: one controller for every page
//! `ListController<T: Resource>` owns a page's collection, filters, pending
//! delete and notice. A record type only states its path, its response
//! envelope and its required fields; see [`framework::Resource`].
//!
//! ### Render state, not callbacks
//! Controllers publish a [`ListView`](framework::ListView) on a watch channel
//! after every change. [`UiState`](framework::UiState) is derived, never
//! stored: after a load resolves it is exactly one of `Error`, `Empty` or
//! `Populated`.
//!
//! ### Patches only after confirmation
//! Deletes go through a two-step `request_delete` / `confirm_delete`; the
//! collection changes only once the server said yes, so failures never need
//! a rollback.
//!
//! ### Stale responses
//! Each load carries a generation number. A slow response to an old filter
//! cannot overwrite the result of a newer one.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic controller, its client, filters, envelopes, view state and
//! validation. Also [`framework::mock`] for testing without a backend.
//!
//! ### 2. The Wire ([`http`])
//! Transport seam, bearer token lookup, status classification and the 401
//! policy, image uploads and exports.
//!
//! ### 3. The App State ([`store`])
//! Auth and cart, behind a reducer actor persisted to key-value storage.
//!
//! ### 4. The Records ([`model`]) and Pages ([`clients`])
//! Resource impls and the page clients adding page-specific operations.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`Console`](lifecycle::Console) wires one API client into every
//! controller, starts them, and shuts them down.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run -- console.toml
//! cargo test
//! ```

pub mod clients;
pub mod framework;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod store;
