//! # Variation Client
//!
//! The variations tab of a product: the list is always scoped to one product,
//! and the form picks each categorical field from its lookup table.
use crate::clients::page_client::PageClient;
use crate::framework::{FieldErrors, ListClient, ListError};
use crate::model::{Variation, VariationInput};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct VariationClient {
    inner: ListClient<Variation>,
}

impl VariationClient {
    pub fn new(inner: ListClient<Variation>) -> Self {
        Self { inner }
    }

    /// Shows only the variations of `product_id`.
    #[instrument(skip(self))]
    pub async fn for_product(&self, product_id: u64) -> Result<Vec<Variation>, ListError> {
        self.inner
            .apply_filter("product_id", product_id.to_string())
            .await
    }

    /// Creates a variation of `product_id`, checking the image first.
    ///
    /// A rejected image fails the submit with the image message, together
    /// with any other form messages, and nothing is sent.
    #[instrument(skip(self, input, image))]
    pub async fn create_with_image(
        &self,
        product_id: u64,
        mut input: VariationInput,
        image: Option<(String, String, Vec<u8>)>,
    ) -> Result<Variation, ListError> {
        input.product_id = Some(product_id);
        if let Some((file_name, content_type, bytes)) = image {
            if let Err(mut fields) = input.select_image(file_name, &content_type, bytes) {
                warn!(%fields, "Image rejected");
                fields.merge(Self::check(&input));
                return Err(ListError::Validation(fields));
            }
        }
        debug!(has_image = input.image.is_some(), "Creating variation");
        self.inner.create(input).await
    }

    /// Validation messages of a form without submitting it.
    pub fn check(input: &VariationInput) -> FieldErrors {
        use crate::framework::Resource;
        Variation::validate_create(input).err().unwrap_or_default()
    }
}

#[async_trait]
impl PageClient<Variation> for VariationClient {
    type Error = ListError;

    fn inner(&self) -> &ListClient<Variation> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::ListController;
    use crate::http::{ApiClient, RequestBody, Session, MAX_IMAGE_BYTES};
    use crate::store::MemoryStorage;
    use serde_json::json;
    use std::sync::Arc;

    fn spawn(mock: &MockTransport) -> VariationClient {
        let api = ApiClient::new(
            Arc::new(mock.clone()),
            Session::new(Arc::new(MemoryStorage::new())),
        );
        let (controller, client) = ListController::<Variation>::new(8);
        tokio::spawn(controller.run(api));
        VariationClient::new(client)
    }

    fn complete_form() -> VariationInput {
        VariationInput {
            name: "Power recliner, grey".into(),
            price: 1249.0,
            stitch_pattern: Some("diamond".into()),
            arm_type_id: Some(1),
            lumbar_type_id: Some(2),
            recline_type: Some("power".into()),
            seat_type: Some("pocket-coil".into()),
            material_type_id: Some(3),
            heat_option_id: Some(1),
            seat_item_type_id: Some(5),
            ..Default::default()
        }
    }

    fn variation_json(id: u64) -> serde_json::Value {
        json!({"id": id, "product_id": 12, "name": "Power recliner, grey", "price": 1249.0})
    }

    #[tokio::test]
    async fn test_oversized_image_blocks_submit() {
        let mock = MockTransport::new();
        let variations = spawn(&mock);

        let err = variations
            .create_with_image(
                12,
                complete_form(),
                Some(("huge.png".into(), "image/png".into(), vec![0; 3 * 1024 * 1024])),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.field_errors().and_then(|f| f.get("image")),
            Some("Image size must be less than 2MB")
        );
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_image_reports_every_form_message() {
        let mock = MockTransport::new();
        let variations = spawn(&mock);
        let mut form = complete_form();
        form.name = "  ".into();
        form.heat_option_id = None;

        let err = variations
            .create_with_image(12, form, Some(("notes.pdf".into(), "application/pdf".into(), vec![1])))
            .await
            .unwrap_err();

        let fields = err.field_errors().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("image"), Some("Only JPEG, JPG, PNG and GIF images are allowed"));
        assert_eq!(fields.get("name"), Some("Name is required"));
        assert_eq!(fields.get("heat_option_id"), Some("Heat option is required"));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_with_image_is_multipart_then_reloads() {
        let mock = MockTransport::new();
        mock.expect_post("/variations")
            .return_json(json!({"data": variation_json(30)}));
        mock.expect_get("/variations")
            .return_json(json!({"data": [variation_json(30)]}));
        let variations = spawn(&mock);

        let created = variations
            .create_with_image(
                12,
                complete_form(),
                Some(("front.jpg".into(), "image/jpeg".into(), vec![0; MAX_IMAGE_BYTES])),
            )
            .await
            .unwrap();
        assert_eq!(created.id, 30);

        let requests = mock.requests();
        match &requests[0].body {
            RequestBody::Multipart(form) => {
                assert_eq!(form.field("product_id"), Some("12"));
                assert_eq!(form.field("_method"), None);
                assert!(form.file.is_some());
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[test]
    fn test_check_reports_without_sending() {
        assert_eq!(VariationClient::check(&VariationInput::default()).len(), 10);
        assert!(VariationClient::check(&complete_form()).is_empty());
    }
}
