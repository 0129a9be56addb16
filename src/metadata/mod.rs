//! Metadata lookup for movie titles.
//!
//! This module defines the [`MovieMetadataProvider`] trait and supporting
//! types that allow Cinelog to fetch movie details from an external service.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and shared data types.
//! - [`omdb`] -- The OMDb implementation used in production.

pub mod omdb;
pub mod provider;

pub use omdb::OmdbProvider;
pub use provider::{FetchError, MovieMetadata, MovieMetadataProvider};
