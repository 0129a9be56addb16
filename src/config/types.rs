use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub omdb: OmdbConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the SQLite database file (created on first start)
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory of the built web UI, served with an SPA fallback
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_db_path() -> String {
    "./cinelog.db".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    /// OMDb API key; the OMDB_API_KEY environment variable is the fallback
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the OMDb API
    #[serde(default = "default_omdb_base_url")]
    pub base_url: String,
}

fn default_omdb_base_url() -> String {
    crate::metadata::omdb::DEFAULT_BASE_URL.to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_omdb_base_url(),
        }
    }
}

impl OmdbConfig {
    /// Resolve the API key from the config file or the OMDB_API_KEY
    /// environment variable. Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var("OMDB_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}
