//! Application state shared across handlers

use crate::catalog::OpenLibrary;
use crate::config::Settings;
use crate::network::HttpClient;
use crate::search::BookSearch;
use std::sync::Arc;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// HTTP client for catalog requests
    pub client: HttpClient,
    /// Catalog endpoints
    pub catalog: Arc<OpenLibrary>,
    /// Book search executor
    pub search: Arc<BookSearch>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, client: HttpClient) -> Self {
        let catalog = OpenLibrary::new(settings.upstream.base_url.clone());
        let search = Arc::new(BookSearch::new(client.clone(), catalog.clone()));

        Self {
            settings: Arc::new(settings),
            client,
            catalog: Arc::new(catalog),
            search,
        }
    }

    /// Build state from settings alone
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let client = HttpClient::with_settings(&settings.upstream)?;
        Ok(Self::new(settings, client))
    }

    /// Check if cross-origin requests are allowed
    pub fn cors_enabled(&self) -> bool {
        self.settings.server.cors
    }
}
