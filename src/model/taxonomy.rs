//! Lookup tables edited from the admin console.
//!
//! Every table shares the same shape (name, description, active flag,
//! timestamps) and the same rule: a name is required. [`taxonomy!`] expands
//! one table into its record type, its input payload and its [`Resource`]
//! impl; tables with extra columns list them after the label.

use crate::framework::{FieldErrors, Resource};
use serde::{Deserialize, Serialize};

fn active() -> bool {
    true
}

/// Name check shared by every table.
pub fn validate_name(name: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require_text("name", name, "Name");
    errors.into_result()
}

macro_rules! taxonomy {
    (
        $(#[$meta:meta])*
        $name:ident, $path:literal, $label:literal
        $(, { $($field:ident : $ty:ty),* $(,)? })?
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct $name {
                pub id: u64,
                pub name: String,
                #[serde(default)]
                pub description: Option<String>,
                #[serde(default = "active")]
                pub is_active: bool,
                $($(
                    #[serde(default)]
                    pub $field: $ty,
                )*)?
                #[serde(default)]
                pub created_at: Option<String>,
                #[serde(default)]
                pub updated_at: Option<String>,
            }

            #[doc = "Create and update payload of [`" $name "`]."]
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct [<$name Input>] {
                pub name: String,
                #[serde(skip_serializing_if = "Option::is_none")]
                pub description: Option<String>,
                pub is_active: bool,
                $($(
                    pub $field: $ty,
                )*)?
            }

            impl [<$name Input>] {
                /// An active entry with only a name.
                pub fn new(name: impl Into<String>) -> Self {
                    Self {
                        name: name.into(),
                        description: None,
                        is_active: true,
                        $($(
                            $field: Default::default(),
                        )*)?
                    }
                }
            }

            impl Resource for $name {
                type Id = u64;
                type Create = [<$name Input>];
                type Update = [<$name Input>];

                const PATH: &'static str = $path;
                const LABEL: &'static str = $label;

                fn id(&self) -> &u64 {
                    &self.id
                }

                fn validate_create(input: &Self::Create) -> Result<(), FieldErrors> {
                    validate_name(&input.name)
                }

                fn validate_update(input: &Self::Update) -> Result<(), FieldErrors> {
                    validate_name(&input.name)
                }
            }
        }
    };
}

taxonomy!(ArmType, "/arm-types", "Arm type");
taxonomy!(
    /// A fabric or leather color, optionally tied to the vendor that supplies it.
    Color, "/colors", "Color", {
        hex_code: Option<String>,
        color_vendor_id: Option<u64>,
    }
);
taxonomy!(ColorVendor, "/color-vendors", "Color vendor");
taxonomy!(CustomerType, "/customer-types", "Customer type");
taxonomy!(HeatOption, "/heat-options", "Heat option");
taxonomy!(ItemType, "/item-types", "Item type");
taxonomy!(LumbarType, "/lumbar-types", "Lumbar type");
taxonomy!(MaterialType, "/material-types", "Material type");
taxonomy!(
    /// Product category. Top-level categories have no parent.
    Category, "/categories", "Category", {
        parent_id: Option<u64>,
    }
);
