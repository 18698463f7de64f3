//! ThingsBoard platform API used by tbext
//!
//! Covers the three calls an extension upload needs: login, paginated
//! resource listing and resource save.

pub mod client;

pub use client::{Session, ThingsBoardClient, AUTH_HEADER};
