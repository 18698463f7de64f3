//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Config file (`--config <path>`, else `tbext.yaml` in the working directory)
//! 3. Environment variables (TBEXT_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;
use tracing::debug;

/// Config file looked up in the search directory when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "tbext.yaml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "TBEXT_";

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Directory searched for `tbext.yaml`
    search_dir: Utf8PathBuf,

    /// Explicit config file; must exist when set
    explicit: Option<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a loader searching the current working directory
    pub fn new(explicit: Option<&Utf8Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| Error::io(".", e))?;
        let search_dir = Utf8PathBuf::from_path_buf(cwd).map_err(|p| {
            Error::invalid_config(format!(
                "Working directory is not valid UTF-8: {}",
                p.display()
            ))
        })?;

        Ok(Self {
            search_dir,
            explicit: explicit.map(Utf8Path::to_path_buf),
        })
    }

    /// Create a loader with a custom search directory
    pub fn with_dir(search_dir: Utf8PathBuf) -> Self {
        Self {
            search_dir,
            explicit: None,
        }
    }

    /// Use an explicit config file
    pub fn with_file(mut self, path: Utf8PathBuf) -> Self {
        self.explicit = Some(path);
        self
    }

    /// Path of the config file that will be read, if any
    pub fn config_path(&self) -> Option<Utf8PathBuf> {
        if let Some(path) = &self.explicit {
            return Some(path.clone());
        }

        let candidate = self.search_dir.join(DEFAULT_CONFIG_FILE);
        candidate.exists().then_some(candidate)
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load(&self) -> Result<RuntimeConfig> {
        let mut config = match self.config_path() {
            Some(path) => {
                debug!("Loading configuration from {}", path);
                Self::load_yaml_file(&path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                RuntimeConfig::default()
            }
        };

        config = Self::apply_env_overrides(config)?;
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load a YAML file and parse it
    fn load_yaml_file(path: &Utf8Path) -> Result<RuntimeConfig> {
        if !path.exists() {
            return Err(Error::invalid_config(format!(
                "Configuration file not found: {}",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| Error::io(path.as_str(), e))?;
        if content.trim().is_empty() {
            return Ok(RuntimeConfig::default());
        }

        let config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Some(val) = env_override("FILE") {
            config.upload.file = val;
        }

        if let Some(val) = env_override("PAGE_SIZE") {
            config.network.page_size = parse_number("PAGE_SIZE", &val)?;
        }

        if let Some(val) = env_override("TIMEOUT_SECS") {
            config.network.timeout_secs = Some(parse_number("TIMEOUT_SECS", &val)?);
        }

        if let Some(val) = env_override("TOKEN_ENV") {
            config.secrets.token_env = val;
        }

        if let Some(val) = env_override("SECRET_VAULT") {
            config.secrets.vault = val;
        }

        if let Some(val) = env_override("SECRET_ITEM") {
            config.secrets.item = val;
        }

        if let Some(val) = env_override("STRICT_LISTING") {
            config.listing.strict = parse_flag("STRICT_LISTING", &val)?;
        }

        Ok(config)
    }

    /// Reject values that would make the run meaningless
    pub fn validate(config: &RuntimeConfig) -> Result<()> {
        if config.network.page_size == 0 {
            return Err(Error::invalid_config("page-size must be at least 1"));
        }

        if config.upload.file.trim().is_empty() {
            return Err(Error::invalid_config("upload file must not be empty"));
        }

        let secrets = &config.secrets;
        for (name, value) in [
            ("token-env", &secrets.token_env),
            ("vault", &secrets.vault),
            ("item", &secrets.item),
            ("username-field", &secrets.username_field),
            ("password-field", &secrets.password_field),
            ("url-field", &secrets.url_field),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid_config(format!(
                    "secrets.{} must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Value of `TBEXT_<key>`, if set
fn env_override(key: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, key)).ok()
}

fn parse_number<T: std::str::FromStr>(key: &str, val: &str) -> Result<T> {
    val.trim().parse().map_err(|_| {
        Error::invalid_config(format!("{}{} must be a valid number", ENV_PREFIX, key))
    })
}

/// Boolean override; anything outside the accepted spellings is an error
fn parse_flag(key: &str, val: &str) -> Result<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::invalid_config(format!(
            "{}{} must be true or false, got '{}'",
            ENV_PREFIX, key, val
        ))),
    }
}
