//! Core types for secret resolution

use std::fmt;
use std::str::FromStr;

use tbext_core::types::SecretsConfig;
use tbext_core::{Error, Result};

use crate::security::SecureString;

/// Scheme of 1Password secret references
pub const REFERENCE_SCHEME: &str = "op://";

/// Address of a single secret: `op://<vault>/<item>[/<section>]/<field>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretReference {
    pub vault: String,
    pub item: String,
    pub section: Option<String>,
    pub field: String,
}

impl SecretReference {
    pub fn new(vault: impl Into<String>, item: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            vault: vault.into(),
            item: item.into(),
            section: None,
            field: field.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let path = raw
            .strip_prefix(REFERENCE_SCHEME)
            .ok_or_else(|| Error::invalid_secret_reference(raw, "must start with op://"))?;

        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::invalid_secret_reference(raw, "empty path segment"));
        }

        match segments.as_slice() {
            [vault, item, field] => Ok(Self::new(*vault, *item, *field)),
            [vault, item, section, field] => Ok(Self {
                section: Some(section.to_string()),
                ..Self::new(*vault, *item, *field)
            }),
            _ => Err(Error::invalid_secret_reference(
                raw,
                "expected op://vault/item/field or op://vault/item/section/field",
            )),
        }
    }
}

impl FromStr for SecretReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SecretReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(
                f,
                "{}{}/{}/{}/{}",
                REFERENCE_SCHEME, self.vault, self.item, section, self.field
            ),
            None => write!(
                f,
                "{}{}/{}/{}",
                REFERENCE_SCHEME, self.vault, self.item, self.field
            ),
        }
    }
}

/// The three references making up the platform service account
#[derive(Debug, Clone)]
pub struct ServiceAccountReferences {
    pub username: SecretReference,
    pub password: SecretReference,
    pub url: SecretReference,
}

impl ServiceAccountReferences {
    pub fn from_config(config: &SecretsConfig) -> Self {
        let reference = |field: &str| SecretReference::new(&config.vault, &config.item, field);
        Self {
            username: reference(&config.username_field),
            password: reference(&config.password_field),
            url: reference(&config.url_field),
        }
    }
}

/// Credential bundle for the platform, resolved once per run
#[derive(Debug, Clone)]
pub struct ServiceAccountSecrets {
    pub username: String,
    pub password: SecureString,
    base_url: String,
}

impl ServiceAccountSecrets {
    pub fn new(username: String, password: SecureString, base_url: &str) -> Self {
        Self {
            username,
            password,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Platform base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
