//! Thin client for the remote test-impact analysis service.
//!
//! The service is opaque: it takes a JSON array of changed files (each with
//! its per-line change list) and answers with a text body. This client only
//! transports the payload; it does not interpret the answer.
//!
//! # Examples
//!
//! ```no_run
//! use analysis_service::config::service_config::AnalysisServiceConfig;
//! use analysis_service::services::test_wiser_service::AnalysisClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = AnalysisServiceConfig::from_env()?;
//! let client = AnalysisClient::new(cfg)?;
//!
//! let answer = client.submit(&serde_json::json!([])).await?;
//! println!("{answer}");
//! # Ok(()) }
//! ```

use std::time::Duration;

use reqwest::header;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::service_config::AnalysisServiceConfig;
use crate::error_handler::{AnalysisError, ConfigError, Result, make_snippet, validate_http_endpoint};

/// Maximum number of body characters kept in [`AnalysisError::HttpStatus`].
const SNIPPET_CHARS: usize = 240;

/// HTTP client for the analysis service.
///
/// Holds a reusable `reqwest::Client`; the configured timeout is applied per
/// request so an injected client keeps its own defaults for everything else.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl AnalysisClient {
    /// Creates a client with a fresh HTTP instance.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if `cfg.endpoint` is not http(s)
    /// - [`AnalysisError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: AnalysisServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("test-wiser/", env!("CARGO_PKG_VERSION")))
            .brotli(true)
            .build()?;
        Self::with_client(cfg, http)
    }

    /// Creates a client around an existing HTTP instance.
    ///
    /// # Errors
    /// [`ConfigError::InvalidFormat`] if `cfg.endpoint` is not http(s).
    pub fn with_client(cfg: AnalysisServiceConfig, http: reqwest::Client) -> Result<Self> {
        let endpoint = cfg.endpoint.trim().to_string();
        validate_http_endpoint("TEST_WISER_URL", &endpoint)?;
        if cfg.timeout_secs == 0 {
            return Err(ConfigError::InvalidNumber {
                var: "TEST_WISER_TIMEOUT_SECS",
                reason: "expected a positive number of seconds",
            }
            .into());
        }

        Ok(Self {
            http,
            endpoint,
            timeout: Duration::from_secs(cfg.timeout_secs),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs `payload` as JSON and returns the response body text.
    ///
    /// # Errors
    /// - [`AnalysisError::Encode`] if the payload cannot be serialised
    /// - [`AnalysisError::Timeout`] if the request exceeds the timeout
    /// - [`AnalysisError::HttpStatus`] for non-2xx responses
    /// - [`AnalysisError::HttpTransport`] for other client errors
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn submit<T>(&self, payload: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload)?;
        debug!(bytes = body.len(), "POST {}", self.endpoint);

        let resp = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            return Err(AnalysisError::HttpStatus {
                status,
                url: self.endpoint.clone(),
                snippet: make_snippet(&text, SNIPPET_CHARS),
            });
        }

        info!(status = status.as_u16(), bytes = text.len(), "analysis service answered");
        Ok(text)
    }

    fn map_transport(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            AnalysisError::Timeout(self.timeout)
        } else {
            AnalysisError::HttpTransport(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{StubResponse, serve_once};

    fn client_for(endpoint: String) -> AnalysisClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        AnalysisClient::with_client(
            AnalysisServiceConfig {
                endpoint,
                timeout_secs: 5,
            },
            http,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn submit_posts_json_and_returns_body() {
        let (url, server) = serve_once(StubResponse::text("200 OK", "[{\"testId\":1}]")).await;
        let client = client_for(url);

        let payload = serde_json::json!([{ "filename": "a.rs", "patch": [] }]);
        let answer = client.submit(&payload).await.unwrap();
        assert_eq!(answer, "[{\"testId\":1}]");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST / HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with("[{\"filename\":\"a.rs\",\"patch\":[]}]"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, server) = serve_once(StubResponse::text("502 Bad Gateway", "upstream\nfailed")).await;
        let client = client_for(url);

        let err = client.submit(&serde_json::json!([])).await.unwrap_err();
        match err {
            AnalysisError::HttpStatus { status, snippet, .. } => {
                assert_eq!(status.as_u16(), 502);
                assert_eq!(snippet, "upstream failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = AnalysisClient::with_client(
            AnalysisServiceConfig {
                endpoint: "file:///tmp/x".into(),
                timeout_secs: 5,
            },
            reqwest::Client::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::Config(ConfigError::InvalidFormat { .. })));
    }
}
