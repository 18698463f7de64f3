//! Fixture builders for ThingsBoard resources

use serde_json::{json, Value};

pub const TEST_TOKEN: &str = "test-jwt-token";
pub const TEST_USERNAME: &str = "svc@example.com";
pub const TEST_PASSWORD: &str = "s3cret";
pub const TEST_TENANT: &str = "13814000-1dd2-11b2-8080-808080808080";

/// A listed extension module as returned by `GET /api/resource`
pub fn listed_module(id: &str, key: &str) -> Value {
    json!({
        "id": {"entityType": "TB_RESOURCE", "id": id},
        "tenantId": {"entityType": "TENANT", "id": TEST_TENANT},
        "createdTime": 1_700_000_000_000_i64,
        "title": key.trim_end_matches(".js"),
        "resourceType": "JS_MODULE",
        "resourceSubType": "EXTENSION",
        "resourceKey": key,
        "fileName": key,
        "etag": format!("etag-{}", id)
    })
}

/// `n` distinct modules whose ids start at `offset`
pub fn listed_modules(offset: usize, n: usize) -> Vec<Value> {
    (offset..offset + n)
        .map(|i| listed_module(&format!("id-{}", i), &format!("module-{}.js", i)))
        .collect()
}

/// One page body
pub fn page_body(data: Vec<Value>, has_next: bool) -> Value {
    let len = data.len();
    json!({
        "data": data,
        "totalPages": 1,
        "totalElements": len,
        "hasNext": has_next
    })
}
