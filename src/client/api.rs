//! Client access to the proxy API

use super::state::SearchParams;
use crate::autocomplete::{Suggestion, SuggestionsResponse};
use crate::catalog::SearchPage;
use crate::config::ClientSettings;
use crate::network::{HttpClient, OutboundRequest};
use crate::query::SearchType;
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Client-side fetch failures
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to the proxy failed: {0}")]
    Transport(#[from] anyhow::Error),

    #[error("proxy returned HTTP {0}")]
    Status(u16),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid proxy URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Operations the client needs from the proxy
#[async_trait]
pub trait BookApi: Send + Sync {
    /// Run a book search
    async fn search_books(&self, params: &SearchParams) -> Result<SearchPage, ClientError>;

    /// Fetch autocomplete suggestions
    async fn suggest(&self, query: &str, kind: SearchType) -> Result<Vec<Suggestion>, ClientError>;
}

/// `BookApi` over HTTP
#[derive(Clone)]
pub struct ProxyApi {
    client: HttpClient,
    base_url: Url,
}

impl ProxyApi {
    pub fn new(client: HttpClient, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Client for the configured proxy URL
    pub fn from_settings(client: HttpClient, settings: &ClientSettings) -> Result<Self, ClientError> {
        Self::new(client, &settings.api_base_url)
    }

    fn endpoint(&self, path: &str) -> Result<String, ClientError> {
        Ok(self.base_url.join(path)?.to_string())
    }

    /// Request for `/api/books`: the search type names the parameter
    pub fn books_request(&self, params: &SearchParams) -> Result<OutboundRequest, ClientError> {
        let mut request = OutboundRequest::get(self.endpoint("/api/books")?)
            .param(params.kind.as_str(), params.query.as_str());

        if let Some(ref year) = params.filters.year {
            request = request.param("year", year.as_str());
        }
        if let Some(ref language) = params.filters.language {
            request = request.param("language", language.as_str());
        }
        Ok(request)
    }

    /// Request for `/api/autocomplete`
    pub fn suggest_request(&self, query: &str, kind: SearchType) -> Result<OutboundRequest, ClientError> {
        Ok(OutboundRequest::get(self.endpoint("/api/autocomplete")?)
            .param("query", query)
            .param("type", kind.as_str()))
    }

    async fn fetch(&self, request: OutboundRequest) -> Result<String, ClientError> {
        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(ClientError::Status(response.status));
        }
        Ok(response.text)
    }
}

#[async_trait]
impl BookApi for ProxyApi {
    async fn search_books(&self, params: &SearchParams) -> Result<SearchPage, ClientError> {
        let text = self.fetch(self.books_request(params)?).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn suggest(&self, query: &str, kind: SearchType) -> Result<Vec<Suggestion>, ClientError> {
        let text = self.fetch(self.suggest_request(query, kind)?).await?;
        let response: SuggestionsResponse = serde_json::from_str(&text)?;
        Ok(response.suggestions)
    }
}
