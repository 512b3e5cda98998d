//! Error types for the TVmaze client.
//!
//! # Design
//! Callers see two failure kinds: the service answered with something other
//! than 200, or no answer arrived at all. The `Display` output of each is the
//! bare message a caller would show a user (`"Not Found"`, `"Network Error"`).
//! A third variant is reserved for typed decoding (`parse_json_as`), where a
//! 200 body that does not fit the caller's type has nowhere else to go.

use thiserror::Error;

/// Boxed error produced by a transport that never received a response.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message carried by every `ApiError::Network`.
pub const NETWORK_ERROR: &str = "Network Error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server responded with a status other than 200.
    #[error("{status_text}")]
    Http { status: u16, status_text: String },

    /// No response was received (DNS failure, refused connection, abort).
    #[error("Network Error")]
    Network {
        #[source]
        source: TransportError,
    },

    /// A 200 response body could not be decoded into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn network(source: impl Into<TransportError>) -> Self {
        ApiError::Network {
            source: source.into(),
        }
    }

    /// HTTP status code, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
