//! Outbound delivery subsystem.
//!
//! # Data Flow
//! ```text
//! prepared payload (transformed or passthrough)
//!     → client.rs (serialize, POST with fixed headers, read full body)
//!     → UpstreamResponse { status, body }
//!     or UpstreamError (transport failure / timeout)
//! ```
//!
//! # Design Decisions
//! - One shared `reqwest::Client`, cloned into every request handler
//! - Every call has a connect and a total deadline
//! - No retries

pub mod client;
pub mod error;

pub use client::{UpstreamClient, UpstreamResponse};
pub use error::{UpstreamError, UpstreamResult};
