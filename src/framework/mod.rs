//! Generic list-page framework.
//!
//! This module provides the building blocks every list page shares: a
//! controller that owns the page state and a handle that drives it.
//!
//! # Main Components
//!
//! - [`Resource`] - Trait that record types implement to be managed by a controller
//! - [`ListController`] - Actor owning one page's collection, filters and pending delete
//! - [`ListClient`] - Type-safe handle to a controller
//! - [`FilterState`] - Filters, sort and pagination, serialized to query parameters
//! - [`Envelope`] - How list responses are unwrapped
//! - [`ListError`] - Errors of controller operations
//!
//! # Testing
//!
//! See [`mock`] for a transport that answers from expectations.

pub mod client;
pub mod controller;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod message;
pub mod mock;
pub mod resource;
pub mod validation;
pub mod view;

pub use client::ListClient;
pub use controller::ListController;
pub use envelope::{Envelope, PageMeta};
pub use error::ListError;
pub use filter::{FilterState, PageSizeParam, SortDirection, SortParams, DEFAULT_PAGE_SIZE, FIRST_PAGE};
pub use message::{ListRequest, Response};
pub use resource::{PatchPolicy, Resource};
pub use validation::FieldErrors;
pub use view::{BannerKind, ErrorBanner, ListView, Notice, NoticeLevel, PendingMutation, UiState};
