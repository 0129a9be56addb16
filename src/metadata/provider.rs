//! Trait definition and types for metadata providers.
//!
//! This module defines the [`MovieMetadataProvider`] trait that metadata
//! backends implement, along with the shared data types returned by lookups.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Metadata for a single movie as reported by a provider.
///
/// Every field except `name` is optional; providers fill in what they know
/// and leave the rest as `None`. Placeholder strings are never used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieMetadata {
    /// Canonical title as the provider spells it.
    pub name: String,
    /// Director name(s), if known.
    pub director: Option<String>,
    /// Release year.
    pub year: Option<i32>,
    /// Aggregate audience rating (typically 0.0 - 10.0).
    pub rating: Option<f64>,
    /// Fully-qualified URL of the poster image.
    pub poster_url: Option<String>,
    /// Link to the movie's IMDb page.
    pub imdb_link: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a lookup produced no usable metadata.
///
/// Callers that only need "did it work" can stringify this; the variants
/// exist so logs can tell a flaky network from a title the provider has
/// never heard of.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP request failed (connect, timeout, non-2xx status).
    #[error("provider request failed: {0}")]
    Transport(String),

    /// The response body could not be interpreted.
    #[error("provider returned a malformed response: {0}")]
    Malformed(String),

    /// The provider answered but does not know the title.
    #[error("provider has no entry for '{0}'")]
    Unknown(String),
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that all metadata providers must implement.
///
/// Each provider wraps a single external API and exposes a uniform lookup
/// interface. Providers are expected to be wrapped in an `Arc` so they can
/// be shared across tasks.
#[async_trait]
pub trait MovieMetadataProvider: Send + Sync {
    /// Look up metadata for `title`.
    ///
    /// A provider-reported "not found" is an error ([`FetchError::Unknown`]),
    /// not an empty success.
    async fn fetch(&self, title: &str) -> Result<MovieMetadata, FetchError>;
}
