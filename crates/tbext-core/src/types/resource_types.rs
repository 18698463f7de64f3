//! ThingsBoard resource wire types

use serde::{Deserialize, Serialize};

/// Resource type of JavaScript modules
pub const JS_MODULE: &str = "JS_MODULE";

/// Resource sub-type of UI extension modules
pub const EXTENSION: &str = "EXTENSION";

/// Entity type used when addressing an existing resource by id
pub const TB_RESOURCE: &str = "TB_RESOURCE";

/// Platform entity identifier, e.g. `{"entityType": "TENANT", "id": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityId {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

impl EntityId {
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: Some(entity_type.into()),
        }
    }

    /// Id addressing an existing resource record
    pub fn resource(id: impl Into<String>) -> Self {
        Self::new(id, TB_RESOURCE)
    }
}

/// A resource record as listed, uploaded and returned by `/api/resource`
///
/// Every field is optional on the way in: list responses omit `data`, and
/// create payloads omit `id`, `tenantId` and `etag`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TbResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_sub_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Base64 file content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
}

impl TbResource {
    /// Id string of the record, if it has one
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.id.as_str())
    }

    /// Tenant id string of the record, if it has one
    pub fn tenant_str(&self) -> Option<&str> {
        self.tenant_id.as_ref().map(|id| id.id.as_str())
    }

    /// Whether this payload addresses an existing record
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    #[serde(default)]
    pub total_pages: Option<u64>,

    #[serde(default)]
    pub total_elements: Option<u64>,

    #[serde(default)]
    pub has_next: bool,
}

/// Body of `POST /api/auth/login`
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/auth/login`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}
