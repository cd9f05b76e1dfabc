//! Settings structures for Book Finder configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub client: ClientSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (`PORT` and the BOOK_FINDER_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        // BOOK_FINDER_PORT wins over the plain PORT used by hosting platforms
        for key in ["PORT", "BOOK_FINDER_PORT"] {
            if let Some(port) = var(key).and_then(|v| v.parse().ok()) {
                self.server.port = port;
            }
        }
        if let Some(val) = var("BOOK_FINDER_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("BOOK_FINDER_CORS") {
            self.server.cors = val.parse().unwrap_or(self.server.cors);
        }
        if let Some(val) = var("BOOK_FINDER_UPSTREAM_URL") {
            self.upstream.base_url = val;
        }
        if let Some(val) = var("BOOK_FINDER_API_URL") {
            self.client.api_base_url = val;
        }
    }
}

/// Proxy server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Allow cross-origin requests from any origin
    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "127.0.0.1".to_string(),
            cors: true,
        }
    }
}

/// Settings for requests sent to the catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Catalog base URL, without a trailing slash
    pub base_url: String,
    /// Request timeout in seconds (none = rely on the network layer)
    pub request_timeout: Option<f64>,
    /// User agent override
    pub user_agent: Option<String>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            request_timeout: None,
            user_agent: None,
        }
    }
}

/// Client-side behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the proxy
    pub api_base_url: String,
    /// Autocomplete debounce in milliseconds
    pub debounce_ms: u64,
    /// Maximum history entries kept (none = uncapped)
    pub history_cap: Option<usize>,
    /// Maximum records displayed per search
    pub max_display_results: usize,
    /// Directory backing the history storage
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            debounce_ms: 300,
            history_cap: crate::client::DEFAULT_HISTORY_CAP,
            max_display_results: crate::client::MAX_DISPLAY_RESULTS,
            storage_dir: None,
        }
    }
}

impl ClientSettings {
    /// Directory for persisted client state
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("book-finder")
        })
    }
}
