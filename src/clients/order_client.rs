//! # Order Client
//!
//! The orders page: status and payment filters, a date range, status changes
//! and the spreadsheet export.
use crate::clients::page_client::PageClient;
use crate::framework::{ListClient, ListError};
use crate::http::{ApiClient, ApiError, Export};
use crate::model::{Order, OrderStatus, OrderUpdate, PaymentStatus};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const EXPORT_PATH: &str = "/orders/export";
const EXPORT_FALLBACK_NAME: &str = "orders.xlsx";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error(transparent)]
    List(#[from] ListError),

    #[error("Export failed: {0}")]
    Export(ApiError),
}

/// Client for the orders page.
#[derive(Clone)]
pub struct OrderClient {
    inner: ListClient<Order>,
    api: ApiClient,
}

impl OrderClient {
    pub fn new(inner: ListClient<Order>, api: ApiClient) -> Self {
        Self { inner, api }
    }

    /// `None` shows every status.
    #[instrument(skip(self))]
    pub async fn filter_status(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, OrderError> {
        let value = status.map(OrderStatus::as_str).unwrap_or_default();
        Ok(self.inner.apply_filter("status", value).await?)
    }

    #[instrument(skip(self))]
    pub async fn filter_payment(&self, status: Option<PaymentStatus>) -> Result<Vec<Order>, OrderError> {
        let value = status.map(PaymentStatus::as_str).unwrap_or_default();
        Ok(self.inner.apply_filter("payment_status", value).await?)
    }

    /// Dates are passed through as `YYYY-MM-DD`; an empty bound is open.
    #[instrument(skip(self))]
    pub async fn filter_dates(&self, from: &str, to: &str) -> Result<Vec<Order>, OrderError> {
        let mut filters = self.inner.view().filters;
        filters.apply("date_from", from);
        filters.apply("date_to", to);
        Ok(self.inner.load_with(filters).await?)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Vec<Order>, OrderError> {
        Ok(self.inner.apply_filter("search", text.trim()).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: u64, status: OrderStatus) -> Result<Order, OrderError> {
        debug!(id, %status, "Updating status");
        let update = OrderUpdate {
            status: Some(status),
            ..Default::default()
        };
        Ok(self.inner.update(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: u64) -> Result<Order, OrderError> {
        let update = OrderUpdate {
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };
        Ok(self.inner.update(id, update).await?)
    }

    /// Downloads the orders matching the current filters. Pagination is not
    /// part of an export.
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<Export, OrderError> {
        let query: Vec<(String, String)> = self
            .inner
            .view()
            .filters
            .to_query()
            .into_iter()
            .filter(|(key, _)| key != "page" && key != "per_page")
            .collect();
        let export = self
            .api
            .download(EXPORT_PATH, query, EXPORT_FALLBACK_NAME)
            .await
            .map_err(OrderError::Export)?;
        info!(file = %export.file_name, size = export.bytes.len(), "Export ready");
        Ok(export)
    }
}

#[async_trait]
impl PageClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ListClient<Order> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::ListController;
    use crate::http::Session;
    use crate::store::MemoryStorage;
    use serde_json::json;
    use std::sync::Arc;

    fn order_json(id: u64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "order_number": format!("ORD-{id:04}"),
            "customer_id": 1,
            "status": status,
            "payment_status": "pending",
            "total": 500.0
        })
    }

    fn spawn(mock: &MockTransport) -> OrderClient {
        let api = ApiClient::new(
            Arc::new(mock.clone()),
            Session::new(Arc::new(MemoryStorage::new())),
        );
        let (controller, client) = ListController::<Order>::new(8);
        tokio::spawn(controller.run(api.clone()));
        OrderClient::new(client, api)
    }

    #[tokio::test]
    async fn test_filter_status_sends_status_and_no_search() {
        let mock = MockTransport::new();
        mock.expect_get("/orders")
            .with_query("status", "pending")
            .return_json(json!({"data": [order_json(1, "pending")]}));
        let orders = spawn(&mock);

        let result = orders.filter_status(Some(OrderStatus::Pending)).await.unwrap();

        assert_eq!(result.len(), 1);
        let request = &mock.requests()[0];
        assert!(!request.has_query("search"));
        assert_eq!(request.query_value("page"), Some("1"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_status_puts_partial_body() {
        let mock = MockTransport::new();
        mock.expect_put("/orders/4")
            .return_json(json!({"data": order_json(4, "shipped")}));
        let orders = spawn(&mock);

        let order = orders.update_status(4, OrderStatus::Shipped).await.unwrap();

        assert_eq!(order.status, OrderStatus::Shipped);
        let request = &mock.requests()[0];
        assert_eq!(
            request.body,
            crate::http::RequestBody::Json(json!({"status": "shipped"}))
        );
    }

    #[tokio::test]
    async fn test_export_passes_filters_without_pagination() {
        let mock = MockTransport::new();
        mock.expect_get("/orders")
            .with_query("status", "delivered")
            .return_json(json!([]));
        mock.expect_get(EXPORT_PATH)
            .with_query("status", "delivered")
            .return_bytes(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                Some("attachment; filename=\"orders-2024.xlsx\""),
                b"PK".to_vec(),
            );
        let orders = spawn(&mock);

        orders.filter_status(Some(OrderStatus::Delivered)).await.unwrap();
        let export = orders.export().await.unwrap();

        assert_eq!(export.file_name, "orders-2024.xlsx");
        assert!(!mock.requests()[1].has_query("page"));
        mock.verify();
    }

    #[tokio::test]
    async fn test_export_failure_is_reported() {
        let mock = MockTransport::new();
        mock.expect_get(EXPORT_PATH)
            .return_status(500, json!({"message": "Export service down"}));
        let orders = spawn(&mock);

        let err = orders.export().await.unwrap_err();
        assert!(matches!(err, OrderError::Export(ApiError::Server { status: 500, .. })));
    }
}
