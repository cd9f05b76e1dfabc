//! HTTP client for requests to the catalog service and the proxy

use super::user_agent::{accept_json, default_user_agent};
use crate::config::UpstreamSettings;
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// Outbound GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// URL to request, without query string
    pub url: String,
    /// Query parameters, sent in order
    pub params: Vec<(String, String)>,
}

impl OutboundRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Value of the first parameter named `key`
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response with the body read as text
#[derive(Debug)]
pub struct OutboundResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl OutboundResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client wrapper shared by the proxy and the client layer
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&UpstreamSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &UpstreamSettings) -> Result<Self> {
        let mut builder = Client::builder().gzip(true);

        if let Some(secs) = settings.request_timeout {
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| anyhow::anyhow!("invalid request timeout {}: {}", secs, e))?;
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            user_agent: settings
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        })
    }

    /// Execute a GET request. Non-2xx statuses are returned, not raised.
    pub async fn execute(&self, request: OutboundRequest) -> Result<OutboundResponse> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json());

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into OutboundResponse
    async fn parse_response(response: Response) -> Result<OutboundResponse> {
        let status = response.status().as_u16();

        let text = response.text().await?;

        Ok(OutboundResponse { status, text })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
