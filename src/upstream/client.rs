//! Aggregator HTTP client with timeout and error handling.
//!
//! # Responsibilities
//! - POST JSON submissions to the configured endpoint
//! - Send the fixed content negotiation headers and optional user agent
//! - Read the complete response body before reporting the outcome
//! - Turn transport failures and deadlines into typed errors

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::upstream::error::{UpstreamError, UpstreamResult};

/// Status and body returned by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamResponse {
    /// The aggregator signals acceptance with exactly 200.
    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// Client for the aggregation endpoint.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: Url,
    connect_timeout_secs: u64,
    timeout_secs: u64,
}

impl UpstreamClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `config` - Outbound endpoint configuration
    /// * `user_agent` - `User-Agent` to send, or `None` to send none
    pub fn new(config: &UpstreamConfig, user_agent: Option<&str>) -> UpstreamResult<Self> {
        let url = Url::parse(&config.url).map_err(|e| UpstreamError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(ua) = user_agent {
            let value = HeaderValue::from_str(ua).map_err(|e| UpstreamError::InvalidHeader {
                name: "User-Agent",
                reason: e.to_string(),
            })?;
            headers.insert(USER_AGENT, value);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(UpstreamError::Client)?;

        tracing::info!(
            url = %url,
            user_agent = user_agent.unwrap_or("<none>"),
            connect_timeout_secs = config.connect_timeout_secs,
            timeout_secs = config.timeout_secs,
            "Upstream client initialized"
        );

        Ok(Self {
            client,
            url,
            connect_timeout_secs: config.connect_timeout_secs,
            timeout_secs: config.timeout_secs,
        })
    }

    /// POST `payload` as JSON and wait for the full response.
    ///
    /// `None` payloads are sent as the literal `null`.
    pub async fn send<T>(&self, payload: &T) -> UpstreamResult<UpstreamResponse>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload)?;

        tracing::debug!(url = %self.url, bytes = body.len(), "Sending submission upstream");

        let response = self
            .client
            .post(self.url.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        Ok(UpstreamResponse { status, body })
    }

    /// Endpoint this client delivers to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        match (error.is_timeout(), error.is_connect()) {
            (true, true) => UpstreamError::ConnectTimeout(self.connect_timeout_secs),
            (true, false) => UpstreamError::Timeout(self.timeout_secs),
            _ => UpstreamError::Transport(error),
        }
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("url", &self.url.as_str())
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn test_config(url: String) -> UpstreamConfig {
        UpstreamConfig {
            url,
            user_agent: None,
            connect_timeout_secs: 1,
            timeout_secs: 1,
            use_system_proxy: false,
        }
    }

    #[test]
    fn test_rejects_invalid_url() {
        let result = UpstreamClient::new(&test_config("not a url".into()), None);
        assert!(matches!(result, Err(UpstreamError::InvalidUrl { .. })));
    }

    #[test]
    fn test_rejects_invalid_user_agent() {
        let config = test_config("http://127.0.0.1:1/submit".into());
        let result = UpstreamClient::new(&config, Some("bad\nagent"));
        assert!(matches!(result, Err(UpstreamError::InvalidHeader { .. })));
    }

    #[test]
    fn test_only_200_is_accepted() {
        let ok = UpstreamResponse {
            status: StatusCode::OK,
            body: String::new(),
        };
        let created = UpstreamResponse {
            status: StatusCode::CREATED,
            body: String::new(),
        };
        assert!(ok.is_accepted());
        assert!(!created.is_accepted());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Grab a free port, then close it so nothing is listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = UpstreamClient::new(&test_config(format!("http://{}/submit", addr)), None)
            .unwrap();
        let result = client.send(&serde_json::Value::Null).await;
        assert!(matches!(result, Err(UpstreamError::Transport(_))));
    }

    #[tokio::test]
    async fn test_silent_upstream_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        });

        // Connected quickly, so the total deadline is the one reported.
        let mut config = test_config(format!("http://{}/submit", addr));
        config.timeout_secs = 2;
        let client = UpstreamClient::new(&config, None).unwrap();
        let result = client.send(&serde_json::json!({ "a": 1 })).await;
        assert!(matches!(result, Err(UpstreamError::Timeout(2))));
    }

    #[tokio::test]
    async fn test_unroutable_upstream_reports_connect_deadline() {
        // TEST-NET-1 address; packets are dropped or rejected, never answered.
        let mut config = test_config("http://192.0.2.1:81/submit".into());
        config.timeout_secs = 4;
        let client = UpstreamClient::new(&config, None).unwrap();

        let result = client.send(&serde_json::Value::Null).await;
        match result {
            Err(UpstreamError::ConnectTimeout(secs)) => assert_eq!(secs, 1),
            // Hosts without a route fail fast instead of timing out.
            Err(UpstreamError::Transport(e)) => assert!(e.is_connect()),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
