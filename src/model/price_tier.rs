use crate::framework::{FieldErrors, Resource};
use serde::{Deserialize, Serialize};

/// Quantity discount: orders of at least `min_quantity` units get
/// `discount_percent` off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub id: u64,
    pub name: String,
    pub min_quantity: u32,
    pub discount_percent: f64,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTierInput {
    pub name: String,
    pub min_quantity: u32,
    pub discount_percent: f64,
    pub is_active: bool,
}

fn validate(input: &PriceTierInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require_text("name", &input.name, "Name");
    if input.min_quantity == 0 {
        errors.insert("min_quantity", "Minimum quantity must be at least 1");
    }
    if !(input.discount_percent > 0.0 && input.discount_percent <= 100.0) {
        errors.insert("discount_percent", "Discount must be between 0 and 100");
    }
    errors.into_result()
}

impl Resource for PriceTier {
    type Id = u64;
    type Create = PriceTierInput;
    type Update = PriceTierInput;

    const PATH: &'static str = "/price-tiers";
    const LABEL: &'static str = "Price tier";

    fn id(&self) -> &u64 {
        &self.id
    }

    fn validate_create(input: &PriceTierInput) -> Result<(), FieldErrors> {
        validate(input)
    }

    fn validate_update(input: &PriceTierInput) -> Result<(), FieldErrors> {
        validate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_bounds() {
        let mut input = PriceTierInput {
            name: "Dealer".into(),
            min_quantity: 10,
            discount_percent: 100.0,
            is_active: true,
        };
        assert!(validate(&input).is_ok());

        input.discount_percent = 0.0;
        input.min_quantity = 0;
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
