//! Outbound error definitions.

use thiserror::Error;

/// Errors that can occur while delivering to the aggregator.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Configured URL could not be parsed.
    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A configured header value is not valid HTTP.
    #[error("Invalid header value for {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Payload could not be encoded as JSON.
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Connection not established within the connect deadline.
    #[error("Upstream connect timeout after {0} seconds")]
    ConnectTimeout(u64),

    /// No complete response within the configured deadline.
    #[error("Upstream timeout after {0} seconds")]
    Timeout(u64),

    /// DNS, TLS, connection or body read failure.
    #[error("Upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Result type for outbound operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
