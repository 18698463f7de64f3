//! Mock server helpers for the ThingsBoard REST API

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::builders::*;

/// Successful login for the test credentials
pub async fn mock_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": TEST_USERNAME, "password": TEST_PASSWORD})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": TEST_TOKEN, "refreshToken": "refresh"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Login answered with the given status and body
pub async fn mock_login_status(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// One listing page, requiring the bearer token and the extension filter
pub async fn mock_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/resource"))
        .and(query_param("page", page.to_string()))
        .and(query_param("pageSize", "100"))
        .and(query_param("resourceType", "JS_MODULE"))
        .and(query_param("resourceSubType", "EXTENSION"))
        .and(header("X-Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// A listing page failing with the given status
pub async fn mock_page_failure(server: &MockServer, page: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/resource"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_string("listing unavailable"))
        .expect(1)
        .mount(server)
        .await;
}

/// Resource save echoing a saved descriptor
pub async fn mock_save(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/resource"))
        .and(header("X-Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Body of the last request received on `path`
pub async fn last_body(server: &MockServer, method_name: &str, request_path: &str) -> Value {
    let requests = server.received_requests().await.unwrap_or_default();
    let request = requests
        .iter()
        .rev()
        .find(|r| r.method.as_str() == method_name && r.url.path() == request_path)
        .expect("no matching request received");
    request.body_json().expect("request body is not JSON")
}
