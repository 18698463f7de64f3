//! Configuration loading

mod loader;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};
