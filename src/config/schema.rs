//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// User agent sent upstream in transform mode (mobile client).
pub const MOBILE_USER_AGENT: &str = "pokemongo/0.35.0 (iPhone; iOS 9.3.5; Scale/2.00)";

/// Default aggregation endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://data.goradar.io/submit";

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Inbound listener settings.
    pub listener: ListenerConfig,

    /// Outbound endpoint settings.
    pub upstream: UpstreamConfig,

    /// Whether inbound envelopes are reshaped or forwarded verbatim.
    pub mode: RelayMode,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// User agent to send upstream, if any.
    ///
    /// An explicitly configured value wins; otherwise transform mode
    /// impersonates the mobile client and passthrough mode sends none.
    pub fn effective_user_agent(&self) -> Option<&str> {
        match (&self.upstream.user_agent, self.mode) {
            (Some(ua), _) => Some(ua.as_str()),
            (None, RelayMode::Transform) => Some(MOBILE_USER_AGENT),
            (None, RelayMode::Passthrough) => None,
        }
    }
}

/// How inbound bodies are prepared before forwarding.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelayMode {
    /// Inbound `{type, message}` envelopes are mapped to the aggregator schema.
    #[default]
    Transform,
    /// Inbound JSON is forwarded untouched.
    Passthrough,
}

impl std::fmt::Display for RelayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayMode::Transform => f.write_str("transform"),
            RelayMode::Passthrough => f.write_str("passthrough"),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,

    /// Total time allowed for one inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl ListenerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_size: 2 * 1024 * 1024, // 2MB
            request_timeout_secs: 30,
        }
    }
}

/// Outbound endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Full URL submissions are POSTed to.
    pub url: String,

    /// Override for the `User-Agent` header.
    pub user_agent: Option<String>,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total time for the outbound request/response in seconds.
    pub timeout_secs: u64,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` style settings from the environment.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            user_agent: None,
            connect_timeout_secs: 5,
            timeout_secs: 10,
            use_system_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
