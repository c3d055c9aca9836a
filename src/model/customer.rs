use crate::framework::{FieldErrors, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub customer_type_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub customer_type_id: Option<u64>,
}

fn validate(input: &CustomerInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require_text("name", &input.name, "Name");
    errors.require_text("email", &input.email, "Email");
    if !input.email.trim().is_empty() && !input.email.contains('@') {
        errors.insert("email", "Email must be a valid email address");
    }
    errors.into_result()
}

impl Resource for Customer {
    type Id = u64;
    type Create = CustomerInput;
    type Update = CustomerInput;

    const PATH: &'static str = "/customers";
    const LABEL: &'static str = "Customer";

    fn id(&self) -> &u64 {
        &self.id
    }

    fn validate_create(input: &CustomerInput) -> Result<(), FieldErrors> {
        validate(input)
    }

    fn validate_update(input: &CustomerInput) -> Result<(), FieldErrors> {
        validate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_needs_an_at_sign() {
        let input = CustomerInput {
            name: "Linus".into(),
            email: "linus.example.com".into(),
            ..Default::default()
        };
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email must be a valid email address"));
    }

    #[test]
    fn test_missing_email_reports_required_only() {
        let errors = validate(&CustomerInput::default()).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.len(), 2);
    }
}
