//! The reqwest transport against an in-process axum server.

use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use seating_console::framework::{ListController, UiState};
use seating_console::http::{
    ApiClient, ApiError, ApiRequest, HttpTransport, ImageUpload, Method, MultipartForm, RequestBody, Session,
    Transport, TOKEN_KEY,
};
use seating_console::model::{Color, ColorInput};
use seating_console::store::{KeyValueStorage, MemoryStorage};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Value {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| Value::String(v.to_string()))
        .unwrap_or(Value::Null)
}

async fn echo(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "authorization": header_value(&headers, header::AUTHORIZATION),
        "accept": header_value(&headers, header::ACCEPT),
        "user_agent": header_value(&headers, header::USER_AGENT),
        "query": query,
    }))
}

async fn colors() -> Json<Value> {
    Json(json!({"data": [{"id": 1, "name": "Walnut"}, {"id": 2, "name": "Slate"}]}))
}

async fn create_color(Json(body): Json<Value>) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(json!({"data": {"id": 3, "name": body["name"]}})),
    )
}

async fn rejected() -> impl IntoResponse {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"})))
}

async fn export() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"../../orders.csv\""),
        ],
        "id,total\n1,500\n",
    )
}

async fn content_type(headers: HeaderMap) -> Json<Value> {
    Json(json!({"content_type": header_value(&headers, header::CONTENT_TYPE)}))
}

/// Serves the test routes under `/api` and returns the base URL.
async fn serve() -> String {
    let app = Router::new()
        .route("/api/echo", get(echo))
        .route("/api/colors", get(colors).post(create_color))
        .route("/api/orders", get(rejected))
        .route("/api/orders/export", get(export))
        .route("/api/upload", post(content_type));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn client(base_url: &str, storage: Arc<MemoryStorage>) -> ApiClient {
    let transport = HttpTransport::new(format!("{base_url}/"), "seating-console-test").unwrap();
    ApiClient::new(Arc::new(transport), Session::new(storage))
}

#[tokio::test]
async fn test_headers_and_query_reach_the_server() {
    let base_url = serve().await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "secret").unwrap();
    let api = client(&base_url, storage);

    let body = api
        .get_json(
            "/echo",
            vec![("page".into(), "2".into()), ("status".into(), "pending".into())],
        )
        .await
        .unwrap();

    assert_eq!(body["authorization"], "Bearer secret");
    assert_eq!(body["accept"], "application/json");
    assert_eq!(body["user_agent"], "seating-console-test");
    assert_eq!(body["query"], json!({"page": "2", "status": "pending"}));
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let base_url = serve().await;
    let api = client(&base_url, Arc::new(MemoryStorage::new()));

    let body = api.get_json("/echo", Vec::new()).await.unwrap();

    assert_eq!(body["authorization"], Value::Null);
}

#[tokio::test]
async fn test_controller_over_real_http() {
    let base_url = serve().await;
    let api = client(&base_url, Arc::new(MemoryStorage::new()));
    let (controller, colors) = ListController::<Color>::new(8);
    tokio::spawn(controller.run(api));

    colors.load().await.unwrap();
    colors.create(ColorInput::new("Ivory")).await.unwrap();

    match colors.view().state {
        UiState::Populated(items) => {
            let names: Vec<_> = items.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["Walnut", "Slate", "Ivory"]);
        }
        other => panic!("expected populated list, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_classified_and_clears_token() {
    let base_url = serve().await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "stale").unwrap();
    let api = client(&base_url, storage.clone());

    let err = api.get_json("/orders", Vec::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(storage.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn test_export_keeps_bytes_and_sanitizes_name() {
    let base_url = serve().await;
    let api = client(&base_url, Arc::new(MemoryStorage::new()));

    let export = api
        .download("/orders/export", Vec::new(), "orders.xlsx")
        .await
        .unwrap();

    assert_eq!(export.file_name, "orders.csv");
    assert_eq!(export.content_type.as_deref(), Some("text/csv"));
    assert_eq!(export.bytes, b"id,total\n1,500\n".to_vec());
}

#[tokio::test]
async fn test_multipart_body_is_sent_as_form_data() {
    let base_url = serve().await;
    let transport = HttpTransport::new(base_url, "seating-console-test").unwrap();
    let upload = ImageUpload::new("arm.gif", "image/gif", vec![0x47, 0x49, 0x46]).unwrap();
    let form = MultipartForm::from_payload(&json!({"name": "Track arm"}), "image", &upload, Some("PUT")).unwrap();

    let response = transport
        .send(
            ApiRequest::new(Method::Post, "/upload").with_body(RequestBody::Multipart(form)),
        )
        .await
        .unwrap();

    let body: Value = serde_json::from_slice(&response.body).unwrap();
    assert!(body["content_type"]
        .as_str()
        .is_some_and(|ct| ct.starts_with("multipart/form-data")));
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(&format!("http://{addr}"), Arc::new(MemoryStorage::new()));

    let err = api.get_json("/colors", Vec::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}
