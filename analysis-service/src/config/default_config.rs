//! Analysis service config loaded from environment-style variables.
//!
//! # Variables
//!
//! - `TEST_WISER_URL`          = service endpoint (optional, defaults to
//!   [`DEFAULT_ENDPOINT`])
//! - `TEST_WISER_TIMEOUT_SECS` = request timeout in seconds (optional,
//!   defaults to [`DEFAULT_TIMEOUT_SECS`])

use crate::{
    config::service_config::AnalysisServiceConfig,
    error_handler::{ConfigError, opt_u64, opt_var, validate_http_endpoint},
};

/// Endpoint used when `TEST_WISER_URL` is not set.
pub const DEFAULT_ENDPOINT: &str =
    "https://4kar344req4lry6ptdp53tqly40sbxmw.lambda-url.us-west-2.on.aws/";

/// Timeout used when `TEST_WISER_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const ENDPOINT_VAR: &str = "TEST_WISER_URL";
const TIMEOUT_VAR: &str = "TEST_WISER_TIMEOUT_SECS";

impl AnalysisServiceConfig {
    /// Builds the config from the process environment.
    ///
    /// # Errors
    /// See [`AnalysisServiceConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if the endpoint lacks an http(s) scheme
    /// - [`ConfigError::InvalidNumber`] if the timeout is not a positive `u64`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint =
            opt_var(&lookup, ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        validate_http_endpoint(ENDPOINT_VAR, &endpoint)?;

        let timeout_secs = opt_u64(&lookup, TIMEOUT_VAR)?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidNumber {
                var: TIMEOUT_VAR,
                reason: "expected a positive number of seconds",
            });
        }

        Ok(Self {
            endpoint,
            timeout_secs,
        })
    }
}
