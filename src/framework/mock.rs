//! # Mock Transport
//!
//! Utilities for testing controllers and clients without a backend.
//!
//! [`MockTransport`] implements [`Transport`] with a queue of expectations.
//! Each expectation names a method and path (and optionally query values),
//! and the response to return. Every request is recorded so tests can assert
//! on what was sent, or that nothing was sent at all.
//!
//! ```rust,ignore
//! let mock = MockTransport::new();
//! mock.expect_get("/orders")
//!     .with_query("status", "pending")
//!     .return_json(json!({"data": []}));
//!
//! let api = ApiClient::new(Arc::new(mock.clone()), session);
//! // drive a controller...
//! mock.verify(); // every expectation was used
//! ```
//!
//! Matching takes the first unused expectation whose method, path and query
//! constraints fit, so concurrent requests do not depend on arrival order.
//! `after(delay)` holds a response back to simulate a slow network.

use crate::http::{ApiError, ApiRequest, ApiResponse, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

struct Expectation {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    delay: Option<Duration>,
    response: Result<ApiResponse, ApiError>,
}

impl Expectation {
    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self
                .query
                .iter()
                .all(|(k, v)| request.query_value(k) == Some(v.as_str()))
    }
}

#[derive(Default)]
struct MockState {
    expectations: Vec<Expectation>,
    requests: Vec<ApiRequest>,
}

/// A transport answering from a list of expectations.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Expects a request with `method` to `path`.
    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            state: self.state.clone(),
            method,
            path: path.into(),
            query: Vec::new(),
            delay: None,
        }
    }

    pub fn expect_get(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, path)
    }

    pub fn expect_post(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, path)
    }

    pub fn expect_put(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Put, path)
    }

    pub fn expect_delete(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Delete, path)
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    /// Panics if any expectation was not used.
    pub fn verify(&self) {
        let state = self.state();
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state
                .expectations
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!("Not all expectations were met. Remaining: {remaining:?}");
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let (delay, response) = {
            let mut state = self.state();
            state.requests.push(request.clone());
            match state.expectations.iter().position(|e| e.matches(&request)) {
                Some(index) => {
                    let expectation = state.expectations.remove(index);
                    (expectation.delay, expectation.response)
                }
                None => {
                    return Err(ApiError::Network(format!(
                        "unexpected request: {} {}",
                        request.method, request.path
                    )))
                }
            }
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

/// Builder for one expectation. Finished by one of the `return_*` methods.
pub struct ExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    delay: Option<Duration>,
}

impl ExpectationBuilder {
    /// Only match requests carrying `key=value`.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Hold the response back for `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn push(self, response: Result<ApiResponse, ApiError>) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.expectations.push(Expectation {
            method: self.method,
            path: self.path,
            query: self.query,
            delay: self.delay,
            response,
        });
    }

    /// Responds 200 with `body`.
    pub fn return_json(self, body: Value) {
        self.push(Ok(ApiResponse::json(200, &body)));
    }

    /// Responds with `status`. A `Value::Null` body is sent as an empty body.
    pub fn return_status(self, status: u16, body: Value) {
        let mut response = ApiResponse::json(status, &body);
        if body.is_null() {
            response.body.clear();
        }
        self.push(Ok(response));
    }

    /// Responds 200 with raw bytes, as an export endpoint does.
    pub fn return_bytes(self, content_type: &str, disposition: Option<&str>, bytes: Vec<u8>) {
        self.push(Ok(ApiResponse {
            status: 200,
            content_type: Some(content_type.to_string()),
            content_disposition: disposition.map(str::to_owned),
            body: bytes,
        }));
    }

    /// Fails at the transport level, before any status exists.
    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_matches_by_query_not_order() {
        let mock = MockTransport::new();
        mock.expect_get("/orders")
            .with_query("status", "shipped")
            .return_json(json!(["shipped"]));
        mock.expect_get("/orders")
            .with_query("status", "pending")
            .return_json(json!(["pending"]));

        let request = ApiRequest::new(Method::Get, "/orders")
            .with_query(vec![("status".to_string(), "pending".to_string())]);
        let response = mock.send(request).await.unwrap();
        assert_eq!(response.body, br#"["pending"]"#.to_vec());
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_request_is_a_network_error() {
        let mock = MockTransport::new();
        let err = mock
            .send(ApiRequest::new(Method::Delete, "/colors/1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        mock.verify();
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_reports_unused_expectations() {
        let mock = MockTransport::new();
        mock.expect_get("/colors").return_json(json!([]));
        mock.verify();
    }
}
