//! Secret source trait and implementations

pub mod onepassword;

use async_trait::async_trait;
use tbext_core::Result;

use crate::security::SecureString;
use crate::types::SecretReference;

/// Trait for secret sources
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Resolve a single reference to its value
    ///
    /// Returns Err if the reference cannot be resolved; there is no optional
    /// secret in this tool.
    async fn resolve(&self, reference: &SecretReference) -> Result<SecureString>;

    /// Validate this source is available (e.g., `op` CLI installed)
    fn validate(&self) -> Result<()>;

    /// Source name for logs and error messages
    fn name(&self) -> &'static str;
}

pub use onepassword::OnePasswordSource;
