//! # Resource Trait
//!
//! The contract every list page's record type implements to be managed by a
//! [`ListController`](crate::framework::ListController).
//!
//! # Architecture Note
//! Every admin page (arm types, colors, orders, price tiers, variations, ...)
//! runs the same fetch / filter / paginate / mutate cycle. The cycle lives in
//! the controller once; a resource only states where it lives, how its
//! responses are wrapped, and which fields are required.
//!
//! Associated types keep payloads apart: a `Color` controller only accepts a
//! `ColorInput`, and the compiler rejects anything else.
//!
//! # Provided Items
//! Envelope, page size, parameter conventions, post-create policy and the
//! validation hooks all have defaults. Override only what the endpoint needs.

use crate::framework::envelope::Envelope;
use crate::framework::filter::{FilterState, PageSizeParam, SortParams, DEFAULT_PAGE_SIZE};
use crate::framework::validation::FieldErrors;
use crate::http::ImageUpload;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};

/// What the controller does with the collection after a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchPolicy {
    /// Append the returned record (or replace the one with the same id).
    Patch,
    /// Re-run the current load.
    Reload,
}

/// A record type served by one REST collection endpoint.
pub trait Resource: Clone + Debug + PartialEq + Send + Sync + DeserializeOwned + 'static {
    /// Opaque identifier, unique within a collection.
    type Id: Clone + Eq + Display + Debug + Send + Sync + 'static;

    /// Payload of a create request.
    type Create: Serialize + Debug + Send + Sync + 'static;

    /// Payload of an update request.
    type Update: Serialize + Debug + Send + Sync + 'static;

    /// Collection path relative to the API origin, e.g. `/arm-types`.
    const PATH: &'static str;

    /// Human name used in notices, e.g. `Arm type`.
    const LABEL: &'static str;

    const ENVELOPE: Envelope = Envelope::Defensive;
    const PAGE_SIZE: u32 = DEFAULT_PAGE_SIZE;
    const PAGE_SIZE_PARAM: PageSizeParam = PageSizeParam::PerPage;
    const SORT_PARAMS: SortParams = SortParams::SortBy;
    const AFTER_CREATE: PatchPolicy = PatchPolicy::Patch;

    /// Multipart field name of an attached image.
    const UPLOAD_FIELD: &'static str = "image";

    fn id(&self) -> &Self::Id;

    /// Initial filter state of the page.
    fn default_filters() -> FilterState {
        FilterState::new(Self::PAGE_SIZE, Self::PAGE_SIZE_PARAM, Self::SORT_PARAMS)
    }

    /// Path of a single record.
    fn item_path(id: &Self::Id) -> String {
        format!("{}/{}", Self::PATH, id)
    }

    /// Required-field checks run before a create is sent.
    fn validate_create(_input: &Self::Create) -> Result<(), FieldErrors> {
        Ok(())
    }

    /// Required-field checks run before an update is sent.
    fn validate_update(_input: &Self::Update) -> Result<(), FieldErrors> {
        Ok(())
    }

    /// Image carried by a create payload. Present means multipart.
    fn create_upload(_input: &Self::Create) -> Option<&ImageUpload> {
        None
    }

    /// Image carried by an update payload. Present means multipart POST.
    fn update_upload(_input: &Self::Update) -> Option<&ImageUpload> {
        None
    }
}
