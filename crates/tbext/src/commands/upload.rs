//! Upload command
//!
//! Resolves the service account from 1Password, logs in to ThingsBoard and
//! creates or updates the extension module whose resource key is the file
//! name. The run stops at the first failure.

use anyhow::{Context, Result};
use camino::Utf8Path;
use tbext_core::types::{RuntimeConfig, TbResource};
use tbext_core::{find_existing, ConfigLoader, Error, ResourceUpload};
use tbext_platform::ThingsBoardClient;
use tbext_secrets::{resolve_service_account, OnePasswordSource, SecretSource};
use tracing::debug;

use crate::cli::UploadArgs;
use crate::output;

/// Characters of the etag shown in the summary
const ETAG_PREVIEW: usize = 16;

pub async fn run(args: UploadArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    output::banner("ThingsBoard Extension Module Upload");

    match execute(&args, config_path).await {
        Ok(saved) => {
            print_summary(&saved);
            Ok(())
        }
        Err(e) => {
            println!();
            output::banner("✗ ERROR");
            output::error(&format!("{:#}", e));
            output::rule();
            Err(e)
        }
    }
}

async fn execute(args: &UploadArgs, config_path: Option<&Utf8Path>) -> Result<TbResource> {
    let config = load_config(args, config_path)?;
    upload_from_env(&config).await
}

/// Runtime config with CLI flags applied on top
fn load_config(args: &UploadArgs, config_path: Option<&Utf8Path>) -> Result<RuntimeConfig> {
    let mut config = ConfigLoader::new(config_path)?
        .load()
        .context("Failed to load configuration")?;

    if let Some(file) = &args.file {
        config.upload.file = file.to_string();
    }
    if let Some(page_size) = args.page_size {
        config.network.page_size = page_size;
    }
    if args.strict_listing {
        config.listing.strict = true;
    }

    ConfigLoader::validate(&config)?;
    Ok(config)
}

/// Build the 1Password source from the environment, then upload
///
/// A missing service-account token fails here, before any subprocess or
/// network call.
pub async fn upload_from_env(config: &RuntimeConfig) -> Result<TbResource> {
    let source = OnePasswordSource::from_env(&config.secrets)?;
    source.validate()?;
    upload(&source, config).await
}

/// Resolve credentials, log in, and create or update the module
pub async fn upload(source: &dyn SecretSource, config: &RuntimeConfig) -> Result<TbResource> {
    output::step("Retrieving credentials from 1Password...");
    let spinner = output::spinner("Resolving service account secrets...");
    let secrets = resolve_service_account(source, &config.secrets).await;
    spinner.finish_and_clear();
    let secrets = secrets.context("1Password authentication failed")?;

    output::info(&format!(
        "Logging in to ThingsBoard at {}...",
        secrets.base_url()
    ));
    let client =
        ThingsBoardClient::new(secrets.base_url(), &config.network)?.with_listing(&config.listing);
    let session = client
        .login(&secrets.username, &secrets.password)
        .await
        .context("ThingsBoard login failed")?;
    output::success("Login successful!");

    let path = Utf8Path::new(&config.upload.file);
    output::kv("File to upload", path.as_str());
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| Error::io(path.as_str(), e))?;
    let upload = ResourceUpload::new(path, &content)?
        .with_type(&config.upload.resource_type, &config.upload.resource_sub_type);
    debug!("Read {} bytes from {}", content.len(), path);

    output::step(&format!(
        "Searching for extension module with key: '{}'",
        upload.resource_key()
    ));
    let resources = client
        .list_resources(&session, upload.resource_type(), upload.resource_sub_type())
        .await
        .context("Failed to list extension modules")?;

    output::info(&format!("Found {} extension module(s):", resources.len()));
    for resource in &resources {
        println!(
            "  - Key: '{}' | Title: '{}' | File: '{}' | Tenant: {}",
            resource.resource_key.as_deref().unwrap_or(""),
            resource.title.as_deref().unwrap_or(""),
            resource.file_name.as_deref().unwrap_or(""),
            resource.tenant_str().unwrap_or("-"),
        );
    }

    let existing = find_existing(&resources, upload.resource_key());
    match &existing {
        Some(found) => {
            output::success(&format!("Match found, will update resource ID: {}", found.id));
            output::step("Updating existing resource");
            output::kv("ID", found.id);
        }
        None => {
            output::info(&format!(
                "No existing extension module found with key: '{}'",
                upload.resource_key()
            ));
            output::step(&format!(
                "Creating new resource with key: '{}'",
                upload.resource_key()
            ));
        }
    }

    let payload = upload.payload(existing.as_ref());
    let saved = client
        .save_resource(&session, &payload)
        .await
        .context("Resource upload failed")?;

    Ok(saved)
}

/// First characters of an etag for display
fn etag_preview(etag: Option<&str>) -> String {
    match etag {
        Some(etag) => format!("{}...", etag.chars().take(ETAG_PREVIEW).collect::<String>()),
        None => "N/A".to_string(),
    }
}

fn print_summary(saved: &TbResource) {
    println!();
    output::banner("✓ UPLOAD SUCCESSFUL!");
    output::kv("Resource ID", saved.id_str().unwrap_or("N/A"));
    output::kv(
        "Resource Key",
        saved.resource_key.as_deref().unwrap_or("N/A"),
    );
    output::kv("Title", saved.title.as_deref().unwrap_or("N/A"));
    output::kv("File Name", saved.file_name.as_deref().unwrap_or("N/A"));
    output::kv("ETag", &etag_preview(saved.etag.as_deref()));
    output::rule();
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tbext_secrets::{SecretReference, SecureString};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "jwt-for-tests";

    /// Resolves the service account to fixed values pointing at a mock server
    struct FixedSource {
        base_url: String,
    }

    #[async_trait]
    impl SecretSource for FixedSource {
        async fn resolve(&self, reference: &SecretReference) -> tbext_core::Result<SecureString> {
            match reference.field.as_str() {
                "username" => Ok(SecureString::from("svc@example.com")),
                "credential" => Ok(SecureString::from("s3cret")),
                "url" => Ok(SecureString::from(self.base_url.as_str())),
                other => Err(Error::secret_resolution(reference.to_string(), other)),
            }
        }

        fn validate(&self) -> tbext_core::Result<()> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn module(id: &str, key: &str, tenant: &str) -> Value {
        json!({
            "id": {"entityType": "TB_RESOURCE", "id": id},
            "tenantId": {"entityType": "TENANT", "id": tenant},
            "title": key.trim_end_matches(".js"),
            "resourceType": "JS_MODULE",
            "resourceSubType": "EXTENSION",
            "resourceKey": key,
            "fileName": key
        })
    }

    fn config_with_file(dir: &TempDir, name: &str, content: &[u8]) -> RuntimeConfig {
        let file = dir.path().join(name);
        std::fs::write(&file, content).unwrap();

        let mut config = RuntimeConfig::default();
        config.upload.file = file.to_string_lossy().into_owned();
        config
    }

    async fn mock_login(server: &MockServer, status: u16) {
        let body = if status == 200 {
            json!({"token": TOKEN})
        } else {
            json!({"status": status, "message": "Authentication failed"})
        };
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mock_listing(server: &MockServer, data: Vec<Value>, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/api/resource"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": data, "hasNext": false})),
            )
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    async fn mock_save(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/resource"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": {"entityType": "TB_RESOURCE", "id": "saved-id"},
                "resourceKey": "widgets.js",
                "title": "widgets",
                "fileName": "widgets.js",
                "etag": "0123456789abcdef0123456789abcdef"
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    async fn saved_payload(server: &MockServer) -> Value {
        let requests = server.received_requests().await.unwrap_or_default();
        let request = requests
            .iter()
            .find(|r| r.method.as_str() == "POST" && r.url.path() == "/api/resource")
            .expect("no upload request received");
        request.body_json().unwrap()
    }

    #[tokio::test]
    async fn test_new_file_is_created() {
        let server = MockServer::start().await;
        mock_login(&server, 200).await;
        mock_listing(&server, vec![module("other-id", "other.js", "t-1")], 1).await;
        mock_save(&server, 1).await;

        let dir = TempDir::new().unwrap();
        let config = config_with_file(&dir, "widgets.js", b"export const x = 1;");
        let source = FixedSource {
            base_url: server.uri(),
        };

        let saved = upload(&source, &config).await.unwrap();
        assert_eq!(saved.id_str(), Some("saved-id"));

        let payload = saved_payload(&server).await;
        assert!(payload.get("id").is_none(), "create must not carry an id");
        assert!(payload.get("tenantId").is_none());
        assert_eq!(payload["resourceKey"], "widgets.js");
        assert_eq!(payload["fileName"], "widgets.js");
        assert_eq!(payload["title"], "widgets");
        assert_eq!(payload["data"], "ZXhwb3J0IGNvbnN0IHggPSAxOw==");
    }

    #[tokio::test]
    async fn test_previous_upload_is_updated() {
        let server = MockServer::start().await;
        mock_login(&server, 200).await;
        mock_listing(
            &server,
            vec![
                module("other-id", "other.js", "t-1"),
                module("prior-id", "widgets.js", "tenant-42"),
            ],
            1,
        )
        .await;
        mock_save(&server, 1).await;

        let dir = TempDir::new().unwrap();
        let config = config_with_file(&dir, "widgets.js", b"v2");
        let source = FixedSource {
            base_url: server.uri(),
        };

        upload(&source, &config).await.unwrap();

        let payload = saved_payload(&server).await;
        assert_eq!(
            payload["id"],
            json!({"id": "prior-id", "entityType": "TB_RESOURCE"})
        );
        assert_eq!(payload["tenantId"]["id"], "tenant-42");
        assert_eq!(payload["resourceKey"], "widgets.js");
    }

    #[tokio::test]
    async fn test_login_failure_skips_listing_and_upload() {
        let server = MockServer::start().await;
        mock_login(&server, 401).await;
        mock_listing(&server, vec![], 0).await;
        mock_save(&server, 0).await;

        let dir = TempDir::new().unwrap();
        let config = config_with_file(&dir, "widgets.js", b"x");
        let source = FixedSource {
            base_url: server.uri(),
        };

        let err = upload(&source, &config).await.unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::LoginFailed { status, .. }) => assert_eq!(*status, 401),
            other => panic!("expected LoginFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_file_fails_before_listing() {
        let server = MockServer::start().await;
        mock_login(&server, 200).await;
        mock_listing(&server, vec![], 0).await;
        mock_save(&server, 0).await;

        let dir = TempDir::new().unwrap();
        let mut config = RuntimeConfig::default();
        config.upload.file = dir.path().join("absent.js").to_string_lossy().into_owned();
        let source = FixedSource {
            base_url: server.uri(),
        };

        let err = upload(&source, &config).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Io { .. })));
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_any_call() {
        let mut config = RuntimeConfig::default();
        config.secrets.token_env = "TBEXT_TEST_TOKEN_THAT_IS_NEVER_SET".to_string();
        config.secrets.op_binary = "op-binary-that-does-not-exist".to_string();

        let err = upload_from_env(&config).await.unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::MissingAccessToken { var }) => {
                assert_eq!(var, "TBEXT_TEST_TOKEN_THAT_IS_NEVER_SET")
            }
            other => panic!("expected MissingAccessToken, got {:?}", other),
        }
    }

    #[test]
    fn test_etag_preview() {
        assert_eq!(
            etag_preview(Some("0123456789abcdef0123456789abcdef")),
            "0123456789abcdef..."
        );
        assert_eq!(etag_preview(Some("short")), "short...");
        assert_eq!(etag_preview(None), "N/A");
    }
}
