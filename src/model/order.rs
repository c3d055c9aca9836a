//! A customer order as listed on the orders page.
//!
//! Orders are filtered by `status`, `payment_status`, a `date_from`/`date_to`
//! range and a free-text `search`. Status changes go through
//! [`OrderClient::update_status`](crate::clients::OrderClient::update_status).

use crate::framework::{FieldErrors, Resource};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: u64,
    #[serde(default)]
    pub variation_id: Option<u64>,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub order_number: String,
    pub customer_id: u64,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub subtotal: f64,
    pub total: f64,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Payload of a new order, usually built from the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewOrder {
    pub customer_id: Option<u64>,
    pub items: Vec<OrderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update. Unset fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Resource for Order {
    type Id = u64;
    type Create = NewOrder;
    type Update = OrderUpdate;

    const PATH: &'static str = "/orders";
    const LABEL: &'static str = "Order";

    fn id(&self) -> &u64 {
        &self.id
    }

    fn validate_create(input: &NewOrder) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require_selected("customer_id", &input.customer_id, "Customer");
        if input.items.is_empty() {
            errors.insert("items", "At least one item is required");
        } else if input.items.iter().any(|line| line.quantity == 0) {
            errors.insert("items", "Every item needs a quantity of at least 1");
        }
        errors.into_result()
    }

    fn validate_update(input: &OrderUpdate) -> Result<(), FieldErrors> {
        if *input == OrderUpdate::default() {
            let mut errors = FieldErrors::new();
            errors.insert("status", "Nothing to update");
            return Err(errors);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statuses_use_lowercase_wire_names() {
        let order: Order = serde_json::from_value(json!({
            "id": 9,
            "order_number": "ORD-0009",
            "customer_id": 3,
            "status": "shipped",
            "payment_status": "paid",
            "total": 1499.0
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.payment_status.to_string(), "paid");
    }

    #[test]
    fn test_partial_update_skips_unset_fields() {
        let update = OrderUpdate {
            status: Some(OrderStatus::Delivered),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"status": "delivered"}));
        assert!(Order::validate_update(&OrderUpdate::default()).is_err());
    }

    #[test]
    fn test_new_order_needs_customer_and_items() {
        let errors = Order::validate_create(&NewOrder::default()).unwrap_err();
        assert!(errors.contains("customer_id"));
        assert!(errors.contains("items"));
    }
}
