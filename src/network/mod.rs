//! HTTP networking module
//!
//! Provides HTTP client functionality for requests to the catalog service.

mod client;
mod user_agent;

pub use client::{HttpClient, OutboundRequest, OutboundResponse};
pub use user_agent::{accept_json, default_user_agent};
