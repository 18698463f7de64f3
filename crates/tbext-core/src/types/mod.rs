//! Type definitions for resources and runtime configuration

mod resource_types;
mod runtime_config;

pub use resource_types::*;
pub use runtime_config::*;
