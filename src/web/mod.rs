//! Web server module
//!
//! Provides the HTTP API of the Book Finder proxy.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ProxyError;
pub use routes::create_router;
pub use state::AppState;
