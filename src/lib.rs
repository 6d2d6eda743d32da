//! GoRadar relay library.
//!
//! Receives scanner events over HTTP, reshapes them into the aggregator's
//! submission format and forwards them upstream.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod transform;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use error::RelayError;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use relay::Relay;
