//! Hosting provider access.
//!
//! Only GitHub is supported: the CI step runs as a GitHub Action and reads
//! its comparison and comment endpoints.

pub mod types;
pub use types::*;

pub mod github;

use crate::errors::{ChangeCollectorResult, ConfigError};
use std::time::Duration;
use tracing::debug;

/// Default REST API base when `GITHUB_API_URL` is not provided.
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Per-request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration for the provider client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base, e.g. "https://api.github.com" or "https://ghe.example/api/v3".
    pub base_api: String,
    /// Access token (workflow token or PAT).
    pub token: String,
}

impl ProviderConfig {
    /// Builds the GitHub client.
    ///
    /// The underlying HTTP client is configured with a stable user agent so
    /// that the provider can identify the integration.
    pub fn build_client(&self) -> ChangeCollectorResult<github::GitHubClient> {
        debug!("Initializing provider client: base_api={}", self.base_api);

        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken.into());
        }
        if !(self.base_api.starts_with("http://") || self.base_api.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_api.clone()).into());
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("test-wiser/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(github::GitHubClient::new(
            http,
            self.base_api.clone(),
            self.token.clone(),
        ))
    }
}
