//! Upsert logic for extension resources
//!
//! The resource key of an uploaded file is its file name including the
//! extension. It is the only thing used to find a previously uploaded record,
//! so re-running an upload updates that record instead of creating a second one.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use camino::Utf8Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{EntityId, TbResource, EXTENSION, JS_MODULE};

/// Suffix stripped from the file name to form the title
pub const TITLE_SUFFIX: &str = ".js";

/// Resource key for an upload path: its file name, extension included
pub fn resource_key(path: &Utf8Path) -> Result<&str> {
    path.file_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::invalid_file_name(path.as_str()))
}

/// Title for a file name: the name without a trailing `.js`
pub fn derive_title(file_name: &str) -> &str {
    file_name.strip_suffix(TITLE_SUFFIX).unwrap_or(file_name)
}

/// An enumerated record whose resource key equals the upload's
#[derive(Debug, Clone, Copy)]
pub struct ResourceMatch<'a> {
    pub id: &'a str,
    pub resource: &'a TbResource,
}

/// Find the first record with the given resource key
///
/// A record that matches but carries no id cannot be addressed by an update
/// and is reported as not found.
pub fn find_existing<'a>(resources: &'a [TbResource], key: &str) -> Option<ResourceMatch<'a>> {
    let resource = resources
        .iter()
        .find(|r| r.resource_key.as_deref() == Some(key))?;

    match resource.id_str() {
        Some(id) => Some(ResourceMatch { id, resource }),
        None => {
            debug!("Resource with key '{}' has no id, treating as new", key);
            None
        }
    }
}

/// A local file prepared for upload
#[derive(Debug, Clone)]
pub struct ResourceUpload {
    file_name: String,
    resource_type: String,
    resource_sub_type: String,
    data: String,
}

impl ResourceUpload {
    /// Prepare a JS extension module upload from a path and its bytes
    pub fn new(path: &Utf8Path, content: &[u8]) -> Result<Self> {
        Ok(Self {
            file_name: resource_key(path)?.to_string(),
            resource_type: JS_MODULE.to_string(),
            resource_sub_type: EXTENSION.to_string(),
            data: STANDARD.encode(content),
        })
    }

    /// Override the resource type and sub-type
    pub fn with_type(mut self, resource_type: &str, resource_sub_type: &str) -> Self {
        self.resource_type = resource_type.to_string();
        self.resource_sub_type = resource_sub_type.to_string();
        self
    }

    pub fn resource_key(&self) -> &str {
        &self.file_name
    }

    pub fn title(&self) -> &str {
        derive_title(&self.file_name)
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn resource_sub_type(&self) -> &str {
        &self.resource_sub_type
    }

    /// Base64 encoded file content
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Payload creating a new record
    pub fn create_payload(&self) -> TbResource {
        TbResource {
            title: Some(self.title().to_string()),
            resource_type: Some(self.resource_type.clone()),
            resource_sub_type: Some(self.resource_sub_type.clone()),
            resource_key: Some(self.file_name.clone()),
            file_name: Some(self.file_name.clone()),
            data: Some(self.data.clone()),
            ..Default::default()
        }
    }

    /// Payload updating the matched record, keeping it in its tenant
    pub fn update_payload(&self, existing: &ResourceMatch<'_>) -> TbResource {
        TbResource {
            id: Some(EntityId::resource(existing.id)),
            tenant_id: existing.resource.tenant_id.clone(),
            ..self.create_payload()
        }
    }

    /// Create or update payload depending on the lookup result
    pub fn payload(&self, existing: Option<&ResourceMatch<'_>>) -> TbResource {
        match existing {
            Some(found) => self.update_payload(found),
            None => self.create_payload(),
        }
    }
}
