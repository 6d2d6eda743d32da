//! Relay pipeline: parse → prepare → deliver.
//!
//! # Design Decisions
//! - Stateless; one `Relay` is shared by every request handler
//! - Ordering per request: body complete, then transform, then send
//! - Unrecognised envelopes are still delivered, as JSON `null`

use serde_json::Value;

use crate::config::{RelayConfig, RelayMode};
use crate::error::RelayError;
use crate::transform;
use crate::upstream::{UpstreamClient, UpstreamResponse, UpstreamResult};

/// Prepares inbound bodies and hands them to the aggregator client.
#[derive(Debug, Clone)]
pub struct Relay {
    mode: RelayMode,
    upstream: UpstreamClient,
}

impl Relay {
    pub fn new(mode: RelayMode, upstream: UpstreamClient) -> Self {
        Self { mode, upstream }
    }

    /// Build the relay and its upstream client from configuration.
    pub fn from_config(config: &RelayConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(&config.upstream, config.effective_user_agent())?;
        Ok(Self::new(config.mode, upstream))
    }

    pub fn mode(&self) -> RelayMode {
        self.mode
    }

    /// Deliver one inbound body.
    ///
    /// Succeeds only when the aggregator answers 200.
    pub async fn forward(&self, body: &[u8]) -> Result<UpstreamResponse, RelayError> {
        let inbound: Value = serde_json::from_slice(body)?;

        let response = match self.mode {
            RelayMode::Transform => {
                let payload = transform::transform(&inbound);
                self.upstream.send(&payload).await?
            }
            RelayMode::Passthrough => self.upstream.send(&inbound).await?,
        };

        crate::observability::metrics::record_upstream_status(response.status.as_u16());

        if response.is_accepted() {
            Ok(response)
        } else {
            Err(RelayError::Rejected {
                status: response.status,
                body: response.body,
            })
        }
    }
}
