//! # tbext-core
//!
//! Core library for tbext providing:
//! - ThingsBoard resource wire types
//! - Resource key/title derivation and create-or-update matching
//! - Hierarchical runtime configuration
//! - The error taxonomy shared by every tbext crate

pub mod config;
pub mod error;
pub mod resource;
pub mod types;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use resource::{derive_title, find_existing, resource_key, ResourceMatch, ResourceUpload};
