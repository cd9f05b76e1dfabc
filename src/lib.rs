//! Book Finder: a book search proxy for the Open Library catalog
//!
//! The proxy translates search parameters into catalog queries and
//! reshapes autocomplete results. The `client` module holds the client-side
//! search state, debounced autocomplete and search history.

pub mod autocomplete;
pub mod catalog;
pub mod client;
pub mod config;
pub mod network;
pub mod query;
pub mod search;
pub mod web;

pub use autocomplete::{Suggestion, SuggestionKey};
pub use catalog::{BookRecord, SearchPage};
pub use config::Settings;
pub use query::{BookQuery, SearchFilters, SearchType};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
