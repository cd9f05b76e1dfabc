//! Book search module
//!
//! Dispatches validated queries to the catalog and decodes the results.

mod executor;

pub use executor::{BookSearch, SearchError};
