//! # Response Envelopes
//!
//! List endpoints of the backend do not agree on a response shape. Some
//! return `{ "data": [...] }`, some a bare array, and the paginated ones
//! `{ "data": { "data": [...], "total": .. } }`. Each resource names the
//! envelope it expects; [`Envelope::Defensive`] accepts all three.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// How a list response body is unwrapped into items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Envelope {
    /// Object with a `data` array, then `data.data`, then a bare array,
    /// otherwise an empty collection.
    #[default]
    Defensive,
    /// `{ "data": [...] }` only.
    Data,
    /// `{ "data": { "data": [...] } }` only.
    NestedData,
    /// `[...]` only.
    Bare,
}

/// Pagination metadata, when the endpoint reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    pub total: Option<u64>,
    pub current_page: Option<u64>,
    pub last_page: Option<u64>,
}

fn data_array(body: &Value) -> Option<&Vec<Value>> {
    body.get("data")?.as_array()
}

fn nested_data_array(body: &Value) -> Option<&Vec<Value>> {
    body.get("data")?.get("data")?.as_array()
}

impl Envelope {
    /// Extracts the raw items. Shapes the envelope does not accept yield an
    /// empty list.
    pub fn items(self, body: &Value) -> Vec<Value> {
        let found = match self {
            Envelope::Defensive => data_array(body)
                .or_else(|| nested_data_array(body))
                .or_else(|| body.as_array()),
            Envelope::Data => data_array(body),
            Envelope::NestedData => nested_data_array(body),
            Envelope::Bare => body.as_array(),
        };
        found.cloned().unwrap_or_default()
    }

    /// Unwraps and deserializes a list body.
    pub fn decode<T: DeserializeOwned>(self, body: &Value) -> Result<Vec<T>, serde_json::Error> {
        self.items(body)
            .into_iter()
            .map(serde_json::from_value)
            .collect()
    }
}

/// Unwraps a single-resource body: `{ "data": {..} }` or the object itself.
pub fn single(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Reads pagination metadata from `meta`, from a paginator nested under
/// `data`, or from the top level.
pub fn page_meta(body: &Value) -> Option<PageMeta> {
    let source = body
        .get("meta")
        .filter(|m| m.is_object())
        .or_else(|| body.get("data").filter(|d| d.is_object()))
        .unwrap_or(body);

    let field = |name: &str| source.get(name).and_then(Value::as_u64);
    let meta = PageMeta {
        total: field("total"),
        current_page: field("current_page"),
        last_page: field("last_page"),
    };
    (meta != PageMeta::default()).then_some(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defensive_accepts_every_observed_shape() {
        let wrapped = json!({"data": [{"id": 1}, {"id": 2}]});
        let bare = json!([{"id": 1}]);
        let nested = json!({"data": {"data": [{"id": 3}], "total": 1}});

        assert_eq!(Envelope::Defensive.items(&wrapped).len(), 2);
        assert_eq!(Envelope::Defensive.items(&bare).len(), 1);
        assert_eq!(Envelope::Defensive.items(&nested)[0]["id"], 3);
        assert!(Envelope::Defensive.items(&json!({"message": "ok"})).is_empty());
        assert!(Envelope::Defensive.items(&Value::Null).is_empty());
    }

    #[test]
    fn test_strict_envelopes_reject_other_shapes() {
        let bare = json!([{"id": 1}]);
        assert!(Envelope::Data.items(&bare).is_empty());
        assert!(Envelope::NestedData.items(&bare).is_empty());
        assert_eq!(Envelope::Bare.items(&bare).len(), 1);
        assert!(Envelope::Bare.items(&json!({"data": []})).is_empty());
    }

    #[test]
    fn test_single_unwraps_data_object_only() {
        assert_eq!(single(json!({"data": {"id": 4}})), json!({"id": 4}));
        assert_eq!(single(json!({"id": 4, "data": null})), json!({"id": 4, "data": null}));
    }

    #[test]
    fn test_page_meta_locations() {
        let meta = page_meta(&json!({"data": [], "meta": {"total": 42, "last_page": 5}})).unwrap();
        assert_eq!(meta.total, Some(42));
        assert_eq!(meta.last_page, Some(5));

        let paginator = json!({"data": {"data": [], "current_page": 2, "last_page": 3, "total": 25}});
        assert_eq!(page_meta(&paginator).unwrap().current_page, Some(2));

        assert!(page_meta(&json!([{"id": 1}])).is_none());
    }
}
