//! A product of the catalog.
//!
//! The shop page pages with `limit` and sorts with `sort`/`order`, unlike the
//! admin tables.

use crate::framework::{FieldErrors, PageSizeParam, Resource, SortParams};
use crate::http::{ImageUpload, UploadError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<u64>,
    pub price: f64,
    /// Public URL of the product image.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: Option<u64>,
    pub price: f64,
    pub is_active: bool,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            is_active: true,
            ..Default::default()
        }
    }

    /// Attaches an image after checking it. A rejected file leaves the
    /// previous selection untouched.
    pub fn select_image(
        &mut self,
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), UploadError> {
        self.image = Some(ImageUpload::new(file_name, content_type, bytes)?);
        Ok(())
    }
}

fn validate(input: &ProductInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require_text("name", &input.name, "Name");
    errors.require_positive("price", input.price, "Price");
    errors.into_result()
}

impl Resource for Product {
    type Id = u64;
    type Create = ProductInput;
    type Update = ProductInput;

    const PATH: &'static str = "/products";
    const LABEL: &'static str = "Product";
    const PAGE_SIZE: u32 = 12;
    const PAGE_SIZE_PARAM: PageSizeParam = PageSizeParam::Limit;
    const SORT_PARAMS: SortParams = SortParams::Sort;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn validate_create(input: &ProductInput) -> Result<(), FieldErrors> {
        validate(input)
    }

    fn validate_update(input: &ProductInput) -> Result<(), FieldErrors> {
        validate(input)
    }

    fn create_upload(input: &ProductInput) -> Option<&ImageUpload> {
        input.image.as_ref()
    }

    fn update_upload(input: &ProductInput) -> Option<&ImageUpload> {
        input.image.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_query_uses_limit_and_sort() {
        let mut filters = Product::default_filters();
        filters.set_sort("price", crate::framework::SortDirection::Asc);
        let query = filters.to_query();
        assert!(query.contains(&("limit".to_string(), "12".to_string())));
        assert!(query.contains(&("sort".to_string(), "price".to_string())));
        assert!(query.contains(&("order".to_string(), "asc".to_string())));
    }

    #[test]
    fn test_image_is_not_serialized_as_json() {
        let mut input = ProductInput::new("Lift chair", 1299.0);
        input.select_image("chair.png", "image/png", vec![1, 2, 3]).unwrap();
        let body = serde_json::to_value(&input).unwrap();
        assert!(body.get("image").is_none());
        assert!(Product::create_upload(&input).is_some());
    }
}
