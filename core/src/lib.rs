//! Sans-IO client core for the TVmaze API.
//!
//! # Overview
//! Builds `HttpRequest` values for every TVmaze endpoint and parses
//! `HttpResponse` values into JSON without touching the network. The
//! caller executes the HTTP round-trip, so the core stays deterministic.
//!
//! # Design
//! - `TvMazeClient` is stateless; it holds only `base_url`.
//! - Each endpoint has a `build_*` method; all responses share `parse_json`.
//! - Optional arguments go through `Query`, which drops absent values.
//! - Response bodies are returned as `serde_json::Value`, unshaped.

pub mod client;
pub mod error;
pub mod http;
pub mod query;
pub mod types;

pub use client::{TvMazeClient, DEFAULT_BASE_URL};
pub use error::{ApiError, TransportError, NETWORK_ERROR};
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::Query;
pub use types::LookupSource;
