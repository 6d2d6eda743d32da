//! Response construction.
//!
//! # Responsibilities
//! - Render every outcome as `{"message": ...}` with a JSON content type
//! - Map aggregator outcomes to local status codes
//!
//! # Status Mapping
//! ```text
//! upstream 200            → 200 {"message": "success"}
//! upstream anything else  → 500 {"message": "failed"}
//! upstream unreachable    → 502 {"message": "failed"}
//! upstream timed out      → 504 {"message": "failed"}
//! body not JSON           → 400 {"message": "invalid json"}
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

pub const SUCCESS: &str = "success";
pub const FAILED: &str = "failed";
pub const INVALID_JSON: &str = "invalid json";
pub const INVALID_BODY: &str = "invalid body";

/// Body of every relay response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// JSON `{"message": ...}` response with the given status.
pub fn message(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(MessageBody {
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Delivery accepted by the aggregator.
pub fn success() -> Response {
    message(StatusCode::OK, SUCCESS)
}
