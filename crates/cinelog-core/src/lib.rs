//! cinelog-core: shared error type and typed identifiers.
//!
//! This crate is the foundational dependency for the other cinelog crates,
//! providing type-safe entity identifiers and a unified error type that API
//! handlers can map to HTTP status codes.

pub mod error;
pub mod ids;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
