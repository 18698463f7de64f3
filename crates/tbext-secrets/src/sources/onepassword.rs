//! 1Password secret source backed by the `op` CLI
//!
//! The CLI authenticates with the service-account token passed through
//! `OP_SERVICE_ACCOUNT_TOKEN` in the child environment; the token never
//! appears on the command line.

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use tbext_core::types::SecretsConfig;
use tbext_core::{Error, Result};
use tokio::process::Command;
use tracing::debug;

use crate::security::{sanitize_error, SecureString};
use crate::sources::SecretSource;
use crate::types::SecretReference;

/// Variable the `op` CLI reads its service-account token from
const OP_TOKEN_VAR: &str = "OP_SERVICE_ACCOUNT_TOKEN";

pub struct OnePasswordSource {
    token: SecureString,
    op_binary: String,
}

impl OnePasswordSource {
    /// Read the service-account token from the configured environment variable
    pub fn from_env(config: &SecretsConfig) -> Result<Self> {
        Self::from_token(std::env::var(&config.token_env).ok(), config)
    }

    /// Build a source from an optional token; absent or blank is an error
    pub fn from_token(token: Option<String>, config: &SecretsConfig) -> Result<Self> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::missing_access_token(&config.token_env))?;

        Ok(Self {
            token: SecureString::new(token),
            op_binary: config.op_binary.clone(),
        })
    }
}

#[async_trait]
impl SecretSource for OnePasswordSource {
    async fn resolve(&self, reference: &SecretReference) -> Result<SecureString> {
        let reference_str = reference.to_string();
        debug!("Running: {} read {}", self.op_binary, reference_str);

        let output = Command::new(&self.op_binary)
            .args(["read", "--no-newline", &reference_str])
            .env(OP_TOKEN_VAR, self.token.expose())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::secret_tool_not_found(&self.op_binary),
                _ => Error::secret_resolution(&reference_str, e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::secret_resolution(
                &reference_str,
                sanitize_error(&stderr),
            ));
        }

        let value = String::from_utf8(output.stdout)
            .map_err(|_| Error::secret_resolution(&reference_str, "value is not valid UTF-8"))?;

        if value.is_empty() {
            return Err(Error::secret_resolution(&reference_str, "secret is empty"));
        }

        Ok(SecureString::new(value))
    }

    fn validate(&self) -> Result<()> {
        which::which(&self.op_binary)
            .map(|path| debug!("Using 1Password CLI at {}", path.display()))
            .map_err(|_| Error::secret_tool_not_found(&self.op_binary))
    }

    fn name(&self) -> &'static str {
        "1password"
    }
}
