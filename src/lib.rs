//! Cinelog - multi-user movie collection service
//!
//! This library crate exposes the core functionality for integration testing.

pub mod collection;
pub mod config;
pub mod metadata;
pub mod server;
