//! # Image Uploads
//!
//! Image fields are checked before they can be attached to a payload: only
//! JPEG, PNG and GIF, at most 2 MiB. A rejected file never becomes an
//! [`ImageUpload`], so it cannot reach a request.

use crate::framework::FieldErrors;
use crate::http::error::ApiError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Image size must be less than 2MB")]
    TooLarge { size: usize },

    #[error("Only JPEG, JPG, PNG and GIF images are allowed")]
    UnsupportedType { content_type: String },
}

impl UploadError {
    /// The error as a single field message.
    pub fn into_field_errors(self, field: &str) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.insert(field, self.to_string());
        errors
    }
}

/// A validated image, ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadError> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(UploadError::UnsupportedType { content_type });
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge { size: bytes.len() });
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Text fields plus at most one file.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file: Option<(String, ImageUpload)>,
}

fn form_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

impl MultipartForm {
    /// Flattens a serializable payload into text fields and attaches `upload`
    /// under `file_field`. `method_override` adds a `_method` field for
    /// updates sent as POST.
    pub fn from_payload<P: Serialize>(
        payload: &P,
        file_field: &str,
        upload: &ImageUpload,
        method_override: Option<&str>,
    ) -> Result<Self, ApiError> {
        let value = serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
        let mut fields: Vec<(String, String)> = match value {
            Value::Object(map) => map
                .iter()
                .filter_map(|(k, v)| form_value(v).map(|v| (k.clone(), v)))
                .collect(),
            _ => Vec::new(),
        };
        if let Some(method) = method_override {
            fields.push(("_method".to_string(), method.to_string()));
        }
        Ok(Self {
            fields,
            file: Some((file_field.to_string(), upload.clone())),
        })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_reqwest(self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some((name, upload)) = self.file {
            let part = reqwest::multipart::Part::bytes(upload.bytes)
                .file_name(upload.file_name)
                .mime_str(&upload.content_type)
                .map_err(|e| ApiError::Network(e.to_string()))?;
            form = form.part(name, part);
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_oversized_png_is_rejected() {
        let err = ImageUpload::new("chair.png", "image/png", vec![0; 3 * 1024 * 1024]).unwrap_err();
        assert_eq!(err.to_string(), "Image size must be less than 2MB");
        assert_eq!(
            err.into_field_errors("image").get("image"),
            Some("Image size must be less than 2MB")
        );
    }

    #[test]
    fn test_type_is_checked_before_size() {
        let err = ImageUpload::new("brochure.pdf", "application/pdf", vec![0; 10]).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));

        let ok = ImageUpload::new("swatch.gif", "IMAGE/GIF", vec![0; MAX_IMAGE_BYTES]).unwrap();
        assert_eq!(ok.content_type(), "image/gif");
    }

    #[test]
    fn test_form_flattens_payload() {
        let upload = ImageUpload::new("a.jpg", "image/jpeg", vec![1, 2, 3]).unwrap();
        let payload = json!({"name": "Walnut", "price": 12.5, "is_active": true, "sku": null});
        let form = MultipartForm::from_payload(&payload, "image", &upload, Some("PUT")).unwrap();

        assert_eq!(form.field("name"), Some("Walnut"));
        assert_eq!(form.field("price"), Some("12.5"));
        assert_eq!(form.field("is_active"), Some("1"));
        assert_eq!(form.field("sku"), None);
        assert_eq!(form.field("_method"), Some("PUT"));
        assert_eq!(form.file.as_ref().map(|(f, _)| f.as_str()), Some("image"));
    }
}
