//! Secret resolution for tbext
//!
//! Resolves the platform service account (username, password, base URL) from
//! 1Password. Values are held in [`SecureString`]s and never logged.

pub mod security;
pub mod sources;
pub mod types;

pub use security::{AuditLog, SecureString};
pub use sources::{OnePasswordSource, SecretSource};
pub use types::{SecretReference, ServiceAccountReferences, ServiceAccountSecrets};

use tbext_core::types::SecretsConfig;
use tbext_core::Result;

/// Resolve one reference, recording an audit entry either way
async fn resolve_audited(
    source: &dyn SecretSource,
    reference: &SecretReference,
) -> Result<SecureString> {
    let audit = AuditLog::new("resolve", reference.to_string(), source.name());
    match source.resolve(reference).await {
        Ok(value) => {
            audit.log();
            Ok(value)
        }
        Err(e) => {
            audit.with_error(e.to_string()).log();
            Err(e)
        }
    }
}

/// Resolve the service-account credential bundle
///
/// The three secrets are read one after another; the first failure ends the
/// resolution.
pub async fn resolve_service_account(
    source: &dyn SecretSource,
    config: &SecretsConfig,
) -> Result<ServiceAccountSecrets> {
    let refs = ServiceAccountReferences::from_config(config);

    let username = resolve_audited(source, &refs.username).await?;
    let password = resolve_audited(source, &refs.password).await?;
    let url = resolve_audited(source, &refs.url).await?;

    Ok(ServiceAccountSecrets::new(
        username.expose().to_string(),
        password,
        url.expose(),
    ))
}
