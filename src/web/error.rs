//! Error responses of the proxy

use crate::query::QueryError;
use crate::search::SearchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors surfaced by API handlers
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid request: {0}")]
    Validation(#[from] QueryError),

    #[error("upstream failure: {0}")]
    Upstream(#[from] SearchError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Static message returned to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::Validation(_) => "A title, author, subject or isbn query is required",
            ProxyError::Upstream(_) => "Failed to fetch books",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::Validation(e) => tracing::debug!("Rejected request: {}", e),
            ProxyError::Upstream(e) => tracing::error!("Book search failed: {}", e),
        }

        let body = Json(serde_json::json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}
