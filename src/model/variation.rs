//! # Product Variations
//!
//! A sellable configuration of a product: price, SKU and one choice from each
//! categorical table. The variation form requires the name, a positive price
//! and eight of the selects; color is optional because many variations are
//! sold in the upholstery the customer picks later.
//!
//! A created variation is followed by a reload, since the server fills in
//! the related records the list shows.

use crate::framework::{FieldErrors, PatchPolicy, Resource};
use crate::http::{ImageUpload, UploadError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub id: u64,
    pub product_id: u64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stitch_pattern: Option<String>,
    #[serde(default)]
    pub arm_type_id: Option<u64>,
    #[serde(default)]
    pub lumbar_type_id: Option<u64>,
    #[serde(default)]
    pub recline_type: Option<String>,
    #[serde(default)]
    pub seat_type: Option<String>,
    #[serde(default)]
    pub material_type_id: Option<u64>,
    #[serde(default)]
    pub heat_option_id: Option<u64>,
    #[serde(default)]
    pub seat_item_type_id: Option<u64>,
    #[serde(default)]
    pub color_id: Option<u64>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Form state of the variation editor. Unset selects are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariationInput {
    pub product_id: Option<u64>,
    pub name: String,
    pub price: f64,
    pub sku: Option<String>,
    pub stitch_pattern: Option<String>,
    pub arm_type_id: Option<u64>,
    pub lumbar_type_id: Option<u64>,
    pub recline_type: Option<String>,
    pub seat_type: Option<String>,
    pub material_type_id: Option<u64>,
    pub heat_option_id: Option<u64>,
    pub seat_item_type_id: Option<u64>,
    pub color_id: Option<u64>,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

impl VariationInput {
    /// Checks and attaches an image.
    ///
    /// On rejection the image is cleared, so a file that failed the check can
    /// never ride along with a later submit.
    pub fn select_image(
        &mut self,
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), FieldErrors> {
        match ImageUpload::new(file_name, content_type, bytes) {
            Ok(upload) => {
                self.image = Some(upload);
                Ok(())
            }
            Err(e) => {
                self.image = None;
                Err(UploadError::into_field_errors(e, "image"))
            }
        }
    }

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, "Name");
        errors.require_positive("price", self.price, "Price");
        errors.require_selected("stitch_pattern", &non_blank(&self.stitch_pattern), "Stitch pattern");
        errors.require_selected("arm_type_id", &self.arm_type_id, "Arm type");
        errors.require_selected("lumbar_type_id", &self.lumbar_type_id, "Lumbar type");
        errors.require_selected("recline_type", &non_blank(&self.recline_type), "Recline type");
        errors.require_selected("seat_type", &non_blank(&self.seat_type), "Seat type");
        errors.require_selected("material_type_id", &self.material_type_id, "Material type");
        errors.require_selected("heat_option_id", &self.heat_option_id, "Heat option");
        errors.require_selected("seat_item_type_id", &self.seat_item_type_id, "Seat item type");
        errors.into_result()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Resource for Variation {
    type Id = u64;
    type Create = VariationInput;
    type Update = VariationInput;

    const PATH: &'static str = "/variations";
    const LABEL: &'static str = "Variation";
    const AFTER_CREATE: PatchPolicy = PatchPolicy::Reload;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn validate_create(input: &VariationInput) -> Result<(), FieldErrors> {
        input.validate()
    }

    fn validate_update(input: &VariationInput) -> Result<(), FieldErrors> {
        input.validate()
    }

    fn create_upload(input: &VariationInput) -> Option<&ImageUpload> {
        input.image.as_ref()
    }

    fn update_upload(input: &VariationInput) -> Option<&ImageUpload> {
        input.image.as_ref()
    }
}
