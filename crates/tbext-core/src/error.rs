//! Error types for tbext-core

use thiserror::Error;

/// Result type alias using tbext-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by every tbext crate
#[derive(Error, Debug)]
pub enum Error {
    /// The secret-service access token is not present in the environment
    #[error("{var} environment variable not set")]
    MissingAccessToken { var: String },

    /// A secret reference is not of the form op://vault/item/field
    #[error("Invalid secret reference '{reference}': {reason}")]
    InvalidSecretReference { reference: String, reason: String },

    /// The secret-manager CLI is not installed
    #[error("Secret manager CLI '{tool}' not found on PATH")]
    SecretToolNotFound { tool: String },

    /// The secret manager refused or failed to resolve a reference
    #[error("Failed to resolve secret {reference}: {message}")]
    SecretResolution { reference: String, message: String },

    /// The base URL returned by the secret manager cannot be used
    #[error("Invalid platform URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// The login endpoint answered with a non-success status
    #[error("Login failed: {status} {body}")]
    LoginFailed { status: u16, body: String },

    /// The login endpoint succeeded but returned no token
    #[error("JWT token not found in login response")]
    MissingSessionToken,

    /// The login token cannot be sent in the authorization header
    #[error("Login returned a token that is not a valid header value")]
    InvalidSessionToken,

    /// A resource call answered with a non-success status
    #[error("{operation} failed: HTTP {status}: {body}")]
    HttpStatus {
        operation: String,
        status: u16,
        body: String,
    },

    /// Transport or decoding failure of an HTTP request
    #[error("{operation} request failed: {source}")]
    Request {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upload path has no usable file name
    #[error("Cannot derive a resource key from path: {path}")]
    InvalidFileName { path: String },

    /// IO error with the path involved
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),
}

impl Error {
    /// Create a missing access token error
    pub fn missing_access_token(var: impl Into<String>) -> Self {
        Self::MissingAccessToken { var: var.into() }
    }

    /// Create an invalid secret reference error
    pub fn invalid_secret_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSecretReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create a secret tool not found error
    pub fn secret_tool_not_found(tool: impl Into<String>) -> Self {
        Self::SecretToolNotFound { tool: tool.into() }
    }

    /// Create a secret resolution error
    pub fn secret_resolution(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecretResolution {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create an invalid base URL error
    pub fn invalid_base_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a login failed error
    pub fn login_failed(status: u16, body: impl Into<String>) -> Self {
        Self::LoginFailed {
            status,
            body: body.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Wrap a reqwest error with the operation that produced it
    pub fn request(operation: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            operation: operation.into(),
            source,
        }
    }

    /// Create an invalid file name error
    pub fn invalid_file_name(path: impl Into<String>) -> Self {
        Self::InvalidFileName { path: path.into() }
    }

    /// Wrap an IO error with the path involved
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_access_token_message_names_variable() {
        let err = Error::missing_access_token("OP_SERVICE_ACCOUNT_TOKEN");
        assert_eq!(
            err.to_string(),
            "OP_SERVICE_ACCOUNT_TOKEN environment variable not set"
        );
    }

    #[test]
    fn test_http_status_surfaces_body() {
        let err = Error::http_status("Resource upload", 400, "{\"message\":\"bad\"}");
        let msg = err.to_string();
        assert!(msg.contains("HTTP 400"));
        assert!(msg.contains("bad"));
    }

    #[test]
    fn test_login_failed_message() {
        let err = Error::login_failed(401, "Authentication failed");
        assert_eq!(err.to_string(), "Login failed: 401 Authentication failed");
    }

    #[test]
    fn test_yaml_error_converts() {
        let yaml_err = serde_yaml_ng::from_str::<Vec<u32>>("[1, two").unwrap_err();
        let err: Error = yaml_err.into();
        assert!(matches!(err, Error::YamlParse(_)));
        assert!(err.to_string().starts_with("YAML parsing error"));
    }
}
