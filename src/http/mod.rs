//! HTTP plumbing shared by every page.
//!
//! - [`Transport`] - the network seam; [`HttpTransport`] is the reqwest implementation
//! - [`ApiClient`] - bearer token, status classification, 401 policy
//! - [`Session`] - token lookup in persisted storage
//! - [`ImageUpload`] / [`MultipartForm`] - validated image payloads
//! - [`Export`] - binary downloads

pub mod client;
pub mod error;
pub mod export;
pub mod session;
pub mod transport;
pub mod upload;

pub use client::ApiClient;
pub use error::ApiError;
pub use export::Export;
pub use session::{Session, SessionEvent, PERSIST_KEY, TOKEN_KEY};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, RequestBody, Transport};
pub use upload::{ImageUpload, MultipartForm, UploadError, ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES};
