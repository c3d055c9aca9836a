//! # App State & Reducer
//!
//! Auth and cart state, the actions that change them, and the pure reducer
//! that applies an action. The reducer is synchronous and runs to completion
//! before the next action is looked at.

use crate::store::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// One cart line. Lines are keyed by product and variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: u64,
    #[serde(default)]
    pub variation_id: Option<u64>,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    fn same_line(&self, product_id: u64, variation_id: Option<u64>) -> bool {
        self.product_id == product_id && self.variation_id == variation_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl CartState {
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub cart: CartState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    LoginSucceeded { token: String, user: UserProfile },
    Logout,
    /// Adds to an existing line with the same product and variation.
    AddToCart(CartItem),
    /// Zero removes the line.
    SetQuantity {
        product_id: u64,
        variation_id: Option<u64>,
        quantity: u32,
    },
    RemoveFromCart {
        product_id: u64,
        variation_id: Option<u64>,
    },
    ClearCart,
}

/// Applies `action` to `state`.
pub fn reduce(state: &AppState, action: StoreAction) -> AppState {
    let mut next = state.clone();
    match action {
        StoreAction::LoginSucceeded { token, user } => {
            next.auth = AuthState {
                token: Some(token),
                user: Some(user),
            };
        }
        StoreAction::Logout => {
            next.auth = AuthState::default();
        }
        StoreAction::AddToCart(item) => {
            if item.quantity == 0 {
                return next;
            }
            match next
                .cart
                .items
                .iter_mut()
                .find(|line| line.same_line(item.product_id, item.variation_id))
            {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => next.cart.items.push(item),
            }
        }
        StoreAction::SetQuantity {
            product_id,
            variation_id,
            quantity,
        } => {
            if quantity == 0 {
                next.cart.items.retain(|line| !line.same_line(product_id, variation_id));
            } else if let Some(line) = next
                .cart
                .items
                .iter_mut()
                .find(|line| line.same_line(product_id, variation_id))
            {
                line.quantity = quantity;
            }
        }
        StoreAction::RemoveFromCart {
            product_id,
            variation_id,
        } => {
            next.cart.items.retain(|line| !line.same_line(product_id, variation_id));
        }
        StoreAction::ClearCart => {
            next.cart = CartState::default();
        }
    }
    next
}

/// Serializes the state in the redux-persist layout: each slice is a JSON
/// string inside the root object.
pub fn snapshot(state: &AppState) -> Result<String, StoreError> {
    let slice = |v: Result<String, serde_json::Error>| v.map_err(|e| StoreError::Corrupt(e.to_string()));
    let root = json!({
        "auth": slice(serde_json::to_string(&state.auth))?,
        "cart": slice(serde_json::to_string(&state.cart))?,
        "_persist": json!({"version": -1, "rehydrated": true}).to_string(),
    });
    Ok(root.to_string())
}

/// Reads a snapshot. Missing or unreadable slices fall back to their defaults.
pub fn rehydrate(blob: &str) -> Result<AppState, StoreError> {
    let root: Value = serde_json::from_str(blob).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    fn slice<S: for<'de> Deserialize<'de> + Default>(root: &Value, key: &str) -> S {
        match root.get(key) {
            Some(Value::String(raw)) => serde_json::from_str(raw).unwrap_or_default(),
            Some(other) => serde_json::from_value(other.clone()).unwrap_or_default(),
            None => S::default(),
        }
    }
    Ok(AppState {
        auth: slice(&root, "auth"),
        cart: slice(&root, "cart"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: u64, variation_id: Option<u64>, quantity: u32) -> CartItem {
        CartItem {
            product_id,
            variation_id,
            name: format!("Chair {product_id}"),
            unit_price: 250.0,
            quantity,
        }
    }

    #[test]
    fn test_add_to_cart_merges_same_line() {
        let state = reduce(&AppState::default(), StoreAction::AddToCart(item(1, Some(7), 1)));
        let state = reduce(&state, StoreAction::AddToCart(item(1, Some(7), 2)));
        let state = reduce(&state, StoreAction::AddToCart(item(1, None, 1)));

        assert_eq!(state.cart.items.len(), 2);
        assert_eq!(state.cart.items[0].quantity, 3);
        assert_eq!(state.cart.item_count(), 4);
        assert_eq!(state.cart.total(), 1000.0);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let state = reduce(&AppState::default(), StoreAction::AddToCart(item(2, None, 2)));
        let state = reduce(
            &state,
            StoreAction::SetQuantity { product_id: 2, variation_id: None, quantity: 0 },
        );
        assert!(state.cart.items.is_empty());
    }

    #[test]
    fn test_logout_keeps_cart() {
        let user = UserProfile { id: 1, name: "Ada".into(), email: "ada@example.com".into(), role: None };
        let state = reduce(&AppState::default(), StoreAction::LoginSucceeded { token: "t".into(), user });
        let state = reduce(&state, StoreAction::AddToCart(item(3, None, 1)));
        let state = reduce(&state, StoreAction::Logout);

        assert!(!state.auth.is_authenticated());
        assert_eq!(state.cart.items.len(), 1);
    }

    #[test]
    fn test_snapshot_uses_string_slices() {
        let state = reduce(&AppState::default(), StoreAction::AddToCart(item(4, None, 1)));
        let blob = snapshot(&state).unwrap();
        let root: Value = serde_json::from_str(&blob).unwrap();
        assert!(root["auth"].is_string());
        assert!(root["cart"].is_string());
        assert_eq!(rehydrate(&blob).unwrap(), state);
    }
}
