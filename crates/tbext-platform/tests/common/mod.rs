//! Common test infrastructure for tbext-platform tests
//!
//! - `builders`: resource fixtures and page bodies
//! - `mock_server`: wiremock setup for the ThingsBoard endpoints

#![allow(dead_code)]

pub mod builders;
pub mod mock_server;

pub use builders::*;
pub use mock_server::*;
