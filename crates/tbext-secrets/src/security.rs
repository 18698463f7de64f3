//! Handling of resolved secret values
//!
//! Values live in [`SecureString`] and are wiped on drop. Resolution is
//! recorded through [`AuditLog`] by reference only, and `op` stderr is passed
//! through [`sanitize_error`] before it reaches an error message.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Service-account tokens are `ops_` followed by base64url text
static SERVICE_ACCOUNT_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"ops_[A-Za-z0-9_\-=]+").ok());

/// A secure string that is automatically zeroed on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    pub fn new(value: String) -> Self {
        Self { inner: value }
    }

    /// Get the string value (use with caution)
    pub fn expose(&self) -> &str {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString([REDACTED {} bytes])", self.len())
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Audit log entry for a secret operation
#[derive(Debug, Clone)]
pub struct AuditLog {
    pub operation: &'static str,
    pub reference: String,
    pub source: &'static str,
    pub success: bool,
    pub error: Option<String>,
}

impl AuditLog {
    pub fn new(operation: &'static str, reference: impl Into<String>, source: &'static str) -> Self {
        Self {
            operation,
            reference: reference.into(),
            source,
            success: true,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }

    /// Log the audit entry (never logs secret values)
    pub fn log(&self) {
        if self.success {
            tracing::debug!(
                operation = self.operation,
                reference = %self.reference,
                source = self.source,
                "Secret operation successful"
            );
        } else {
            tracing::warn!(
                operation = self.operation,
                reference = %self.reference,
                source = self.source,
                error = ?self.error,
                "Secret operation failed"
            );
        }
    }
}

/// Trim `op` stderr and redact any service-account token echoed in it
pub fn sanitize_error(stderr: &str) -> String {
    let trimmed = stderr.trim();
    match &*SERVICE_ACCOUNT_TOKEN {
        Some(re) => re.replace_all(trimmed, "[REDACTED_TOKEN]").into_owned(),
        None => trimmed.to_string(),
    }
}
