//! Runtime configuration types
//!
//! Every field has a default, so an empty or partial YAML file is valid.

use serde::{Deserialize, Serialize};

use super::resource_types::{EXTENSION, JS_MODULE};

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// What to upload and how to classify it
    #[serde(default)]
    pub upload: UploadConfig,

    /// Where the service-account credentials live
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// HTTP client settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// Resource enumeration behavior
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Upload target settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UploadConfig {
    /// Local file uploaded as the extension module
    #[serde(default = "default_file")]
    pub file: String,

    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(default = "default_resource_sub_type")]
    pub resource_sub_type: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
            resource_type: default_resource_type(),
            resource_sub_type: default_resource_sub_type(),
        }
    }
}

fn default_file() -> String {
    "target/generated-resources/thingsboard-extension-widgets.js".to_string()
}
fn default_resource_type() -> String {
    JS_MODULE.to_string()
}
fn default_resource_sub_type() -> String {
    EXTENSION.to_string()
}

/// 1Password service-account settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecretsConfig {
    /// Environment variable holding the service-account token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_vault")]
    pub vault: String,

    #[serde(default = "default_item")]
    pub item: String,

    #[serde(default = "default_username_field")]
    pub username_field: String,

    #[serde(default = "default_password_field")]
    pub password_field: String,

    #[serde(default = "default_url_field")]
    pub url_field: String,

    /// Name or path of the 1Password CLI
    #[serde(default = "default_op_binary")]
    pub op_binary: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            vault: default_vault(),
            item: default_item(),
            username_field: default_username_field(),
            password_field: default_password_field(),
            url_field: default_url_field(),
            op_binary: default_op_binary(),
        }
    }
}

fn default_token_env() -> String {
    "OP_SERVICE_ACCOUNT_TOKEN".to_string()
}
fn default_vault() -> String {
    "thingsboard".to_string()
}
fn default_item() -> String {
    "prd-service-account".to_string()
}
fn default_username_field() -> String {
    "username".to_string()
}
fn default_password_field() -> String {
    "credential".to_string()
}
fn default_url_field() -> String {
    "url".to_string()
}
fn default_op_binary() -> String {
    "op".to_string()
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Resources requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout; unset leaves the client default (none)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}
fn default_user_agent() -> String {
    format!(
        "tbext/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Resource enumeration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListingConfig {
    /// Fail the run when a listing page cannot be fetched, instead of
    /// continuing with the pages gathered so far
    #[serde(default)]
    pub strict: bool,
}
