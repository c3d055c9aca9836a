//! # Field Validation
//!
//! Client-side checks that run before a mutation is dispatched. A failing
//! check never reaches the network: the controller answers with
//! [`ListError::Validation`](crate::framework::ListError::Validation) and the
//! form renders each message next to its input.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Field name to message map, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. The first message for a field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn require_text(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.insert(field, format!("{label} is required"));
        }
    }

    pub fn require_selected<V>(&mut self, field: &str, value: &Option<V>, label: &str) {
        if value.is_none() {
            self.insert(field, format!("{label} is required"));
        }
    }

    pub fn require_positive(&mut self, field: &str, value: f64, label: &str) {
        if !(value > 0.0) {
            self.insert(field, format!("{label} must be greater than 0"));
        }
    }

    /// Reads a Laravel-style 422 body: `{"errors": {"field": ["message", ...]}}`.
    ///
    /// Only the first message of each field is kept.
    pub fn from_server(body: &Value) -> Option<Self> {
        let errors = body.get("errors")?.as_object()?;
        let mut fields = FieldErrors::new();
        for (field, messages) in errors {
            let message = match messages {
                Value::String(s) => Some(s.clone()),
                Value::Array(items) => items.iter().find_map(|m| m.as_str().map(str::to_owned)),
                _ => None,
            };
            if let Some(message) = message {
                fields.insert(field.clone(), message);
            }
        }
        (!fields.is_empty()).then_some(fields)
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_checks_collect_one_message_per_field() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", "   ", "Name");
        errors.require_positive("price", 0.0, "Price");
        errors.require_selected::<u64>("arm_type_id", &None, "Arm type");
        errors.require_text("name", "", "Name");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("price"), Some("Price must be greater than 0"));
        assert_eq!(errors.get("arm_type_id"), Some("Arm type is required"));
    }

    #[test]
    fn test_nan_price_is_rejected() {
        let mut errors = FieldErrors::new();
        errors.require_positive("price", f64::NAN, "Price");
        assert!(errors.contains("price"));
    }

    #[test]
    fn test_from_server_keeps_first_message() {
        let body = json!({
            "message": "The given data was invalid.",
            "errors": {
                "name": ["The name field is required.", "Too short."],
                "price": "Bad price"
            }
        });
        let errors = FieldErrors::from_server(&body).unwrap();
        assert_eq!(errors.get("name"), Some("The name field is required."));
        assert_eq!(errors.get("price"), Some("Bad price"));
        assert!(FieldErrors::from_server(&json!({"message": "nope"})).is_none());
    }
}
