//! Request-level error type.
//!
//! Every failure while relaying one inbound request ends up here and is
//! rendered as a JSON `{"message": ...}` response.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response;
use crate::upstream::UpstreamError;

/// Errors that end a relayed request without a successful delivery.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Inbound body could not be read (too large, aborted).
    #[error("Failed to read request body: {0}")]
    Body(#[source] BytesRejection),

    /// Inbound body is not JSON.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Aggregator answered with something other than 200.
    #[error("Upstream rejected submission with status {status}")]
    Rejected { status: StatusCode, body: String },

    /// Aggregator could not be reached in time.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    /// Local status reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Body(rejection) => rejection.status(),
            RelayError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            RelayError::Rejected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Upstream(UpstreamError::Timeout(_) | UpstreamError::ConnectTimeout(_)) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            RelayError::Upstream(UpstreamError::Transport(_)) => StatusCode::BAD_GATEWAY,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::Body(_) => "invalid_body",
            RelayError::InvalidJson(_) => "invalid_json",
            RelayError::Rejected { .. } => "rejected",
            RelayError::Upstream(UpstreamError::Timeout(_) | UpstreamError::ConnectTimeout(_)) => {
                "timeout"
            }
            RelayError::Upstream(UpstreamError::Transport(_)) => "transport",
            RelayError::Upstream(_) => "internal",
        }
    }

    /// Client-caused errors are logged at a lower level.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    fn message(&self) -> &'static str {
        match self {
            RelayError::Body(_) => response::INVALID_BODY,
            RelayError::InvalidJson(_) => response::INVALID_JSON,
            _ => response::FAILED,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        response::message(self.status_code(), self.message())
    }
}
