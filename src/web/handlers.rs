//! HTTP request handlers

use super::error::ProxyError;
use super::state::AppState;
use crate::autocomplete::{fetch_suggestions, SuggestionsResponse};
use crate::catalog::SearchPage;
use crate::query::{first_values, BookParams, BookQuery, SearchType};
use axum::{
    extract::{RawQuery, State},
    response::IntoResponse,
    Json,
};

/// Liveness handler
pub async fn index() -> impl IntoResponse {
    "Book Finder proxy is running!"
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Book search handler
pub async fn books(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<SearchPage>, ProxyError> {
    let params = BookParams::from_query(raw.as_deref());
    let query = BookQuery::from_params(&params)?;
    let page = state.search.execute(&query).await?;
    Ok(Json(page))
}

/// Autocomplete handler
pub async fn autocomplete(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Json<SuggestionsResponse> {
    let mut params = first_values(raw.as_deref());
    let query = match params.remove("query") {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Json(SuggestionsResponse::default()),
    };

    let kind = params
        .get("type")
        .map(String::as_str)
        .map(SearchType::parse_lenient)
        .unwrap_or_default();

    let suggestions = fetch_suggestions(&state.client, &state.catalog, &query, kind).await;

    Json(SuggestionsResponse {
        suggestions,
        kind: Some(kind),
    })
}
