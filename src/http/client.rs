//! # API Client
//!
//! Wraps a [`Transport`] with the behaviour every request shares: the bearer
//! token, status classification, and the 401 policy.

use crate::http::error::ApiError;
use crate::http::export::Export;
use crate::http::session::Session;
use crate::http::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
use crate::http::upload::MultipartForm;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Cheap to clone; every clone shares the transport and session.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
}

fn parse_json(response: &ApiResponse) -> Result<Value, ApiError> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sends `request` with the current token. Non-2xx responses become
    /// [`ApiError`]s; a 401 also expires the session.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        request.bearer = self.session.token();
        debug!(authenticated = request.bearer.is_some(), "Sending request");

        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let err = ApiError::from_status(response.status, &response.body);
        if err.is_unauthorized() {
            warn!("Session rejected, clearing credentials");
            self.session.expire();
        } else {
            debug!(status = response.status, error = %err, "Request failed");
        }
        Err(err)
    }

    pub async fn get_json(&self, path: &str, query: Vec<(String, String)>) -> Result<Value, ApiError> {
        let response = self
            .execute(ApiRequest::new(Method::Get, path).with_query(query))
            .await?;
        parse_json(&response)
    }

    pub async fn send_json(&self, method: Method, path: &str, body: Value) -> Result<Value, ApiError> {
        let response = self
            .execute(ApiRequest::new(method, path).with_body(RequestBody::Json(body)))
            .await?;
        parse_json(&response)
    }

    /// Multipart requests are always POST.
    pub async fn send_multipart(&self, path: &str, form: MultipartForm) -> Result<Value, ApiError> {
        let response = self
            .execute(ApiRequest::new(Method::Post, path).with_body(RequestBody::Multipart(form)))
            .await?;
        parse_json(&response)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::new(Method::Delete, path)).await?;
        Ok(())
    }

    /// Fetches a binary export. The body is not parsed.
    pub async fn download(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        fallback_name: &str,
    ) -> Result<Export, ApiError> {
        let response = self
            .execute(ApiRequest::new(Method::Get, path).with_query(query))
            .await?;
        Ok(Export::from_response(response, fallback_name))
    }
}
