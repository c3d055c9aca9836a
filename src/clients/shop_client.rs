//! # Shop Client
//!
//! The storefront: browse products by category or search, and put a product
//! (optionally one of its variations) into the cart kept by the app store.
use crate::clients::page_client::PageClient;
use crate::framework::{ListClient, ListError, SortDirection};
use crate::model::{Product, Variation};
use crate::store::{AppState, CartItem, StoreClient, StoreError};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShopError {
    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Variation {variation_id} does not belong to product {product_id}")]
    VariationMismatch { product_id: u64, variation_id: u64 },
}

#[derive(Clone)]
pub struct ShopClient {
    products: ListClient<Product>,
    store: StoreClient,
}

impl ShopClient {
    pub fn new(products: ListClient<Product>, store: StoreClient) -> Self {
        Self { products, store }
    }

    #[instrument(skip(self))]
    pub async fn by_category(&self, category_id: Option<u64>) -> Result<Vec<Product>, ShopError> {
        let value = category_id.map(|id| id.to_string()).unwrap_or_default();
        Ok(self.products.apply_filter("category", value).await?)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Vec<Product>, ShopError> {
        Ok(self.products.apply_filter("search", text.trim()).await?)
    }

    #[instrument(skip(self))]
    pub async fn sort_by_price(&self, direction: SortDirection) -> Result<Vec<Product>, ShopError> {
        Ok(self.products.set_sort("price", direction).await?)
    }

    /// Adds `quantity` units to the cart. A variation's price replaces the
    /// product's base price.
    #[instrument(skip(self, product, variation), fields(product_id = product.id))]
    pub async fn add_to_cart(
        &self,
        product: &Product,
        variation: Option<&Variation>,
        quantity: u32,
    ) -> Result<AppState, ShopError> {
        let item = match variation {
            Some(v) if v.product_id != product.id => {
                return Err(ShopError::VariationMismatch {
                    product_id: product.id,
                    variation_id: v.id,
                })
            }
            Some(v) => CartItem {
                product_id: product.id,
                variation_id: Some(v.id),
                name: format!("{} ({})", product.name, v.name),
                unit_price: v.price,
                quantity,
            },
            None => CartItem {
                product_id: product.id,
                variation_id: None,
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
            },
        };
        let state = self.store.add_to_cart(item).await?;
        info!(items = state.cart.item_count(), total = state.cart.total(), "Cart updated");
        Ok(state)
    }

    pub fn cart(&self) -> &StoreClient {
        &self.store
    }
}

#[async_trait]
impl PageClient<Product> for ShopClient {
    type Error = ShopError;

    fn inner(&self) -> &ListClient<Product> {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::ListController;
    use crate::http::{ApiClient, Session};
    use crate::store::{AppStore, MemoryStorage};
    use serde_json::json;
    use std::sync::Arc;

    fn spawn(mock: &MockTransport) -> ShopClient {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        let api = ApiClient::new(Arc::new(mock.clone()), session.clone());
        let (controller, products) = ListController::<Product>::new(8);
        let (store, store_client) = AppStore::new(storage, 8);
        tokio::spawn(controller.run(api));
        tokio::spawn(store.run(session.subscribe()));
        ShopClient::new(products, store_client)
    }

    fn product() -> Product {
        Product {
            id: 5,
            name: "Lift chair".into(),
            description: None,
            category_id: Some(2),
            price: 1000.0,
            image: None,
            is_active: true,
        }
    }

    fn variation(product_id: u64) -> Variation {
        serde_json::from_value(json!({
            "id": 51,
            "product_id": product_id,
            "name": "Leather",
            "price": 1200.0
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_category_filter_uses_limit_paging() {
        let mock = MockTransport::new();
        mock.expect_get("/products")
            .with_query("category", "2")
            .with_query("limit", "12")
            .return_json(json!({"data": {"data": [], "total": 0}}));
        let shop = spawn(&mock);

        let products = shop.by_category(Some(2)).await.unwrap();

        assert!(products.is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn test_variation_price_goes_into_cart() {
        let shop = spawn(&MockTransport::new());

        shop.add_to_cart(&product(), None, 1).await.unwrap();
        let state = shop.add_to_cart(&product(), Some(&variation(5)), 2).await.unwrap();

        assert_eq!(state.cart.items.len(), 2);
        assert_eq!(state.cart.total(), 3400.0);
    }

    #[tokio::test]
    async fn test_foreign_variation_is_rejected() {
        let shop = spawn(&MockTransport::new());
        let err = shop
            .add_to_cart(&product(), Some(&variation(6)), 1)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ShopError::VariationMismatch { product_id: 5, variation_id: 51 }
        );
        assert!(shop.cart().state().cart.items.is_empty());
    }
}
