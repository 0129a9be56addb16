//! OMDb metadata provider.
//!
//! Talks to the [OMDb API](https://www.omdbapi.com/) title-lookup endpoint.
//! OMDb reports absent fields as the literal string `"N/A"`, so every field
//! is normalized before it reaches the rest of the application.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{FetchError, MovieMetadata, MovieMetadataProvider};

/// Production endpoint of the OMDb API.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// IMDb title page prefix used to build `imdb_link` from an imdbID.
const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/";

/// Upper bound on a single lookup request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Raw OMDb title response.
///
/// OMDb signals lookup failure in-band: HTTP 200 with `"Response": "False"`
/// plus an `Error` string.
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Metadata provider backed by the OMDb API.
pub struct OmdbProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OmdbProvider {
    /// Create a provider pointed at the production OMDb endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a provider pointed at a custom endpoint.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl MovieMetadataProvider for OmdbProvider {
    async fn fetch(&self, title: &str) -> Result<MovieMetadata, FetchError> {
        debug!(title = %title, "OMDb title lookup");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let body: OmdbResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        if !body.response.eq_ignore_ascii_case("true") {
            debug!(title = %title, reason = ?body.error, "OMDb has no entry");
            return Err(FetchError::Unknown(title.to_string()));
        }

        let name = normalize(body.title)
            .ok_or_else(|| FetchError::Malformed("response is missing the title".to_string()))?;

        Ok(MovieMetadata {
            name,
            director: normalize(body.director),
            year: normalize(body.year).and_then(|y| y.parse::<i32>().ok()),
            rating: normalize(body.imdb_rating).and_then(|r| r.parse::<f64>().ok()),
            poster_url: normalize(body.poster),
            imdb_link: normalize(body.imdb_id).map(|id| format!("{}{}/", IMDB_TITLE_URL, id)),
        })
    }
}

/// Collapse OMDb's `"N/A"` placeholder and blank strings to `None`.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "N/A")
}
