//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors_enabled = state.cors_enabled();

    let router = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // API routes
        .route("/api/books", get(handlers::books))
        .route("/api/autocomplete", get(handlers::autocomplete))
        .layer(CompressionLayer::new());

    let router = if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    };

    router.with_state(state)
}
