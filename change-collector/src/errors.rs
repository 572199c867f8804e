//! Crate-wide error hierarchy for change-collector.

use patch_mapper::PatchMapError;
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ChangeCollectorResult<T> = Result<T, ChangeCollectorError>;

/// Root error type for the change-collector crate.
#[derive(Debug, Error)]
pub enum ChangeCollectorError {
    /// Hosting provider (GitHub) related failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// CI event could not be read or lacks required data.
    #[error(transparent)]
    Event(#[from] EventError),

    /// Configuration problems (missing token, bad repository slug, etc.).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A file's patch text could not be reduced to line records.
    #[error("failed to map patch of {file}: {source}")]
    Patch {
        file: String,
        #[source]
        source: PatchMapError,
    },
}

/// Provider-specific error used inside the provider layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Validation failed on the provider side (HTTP 422), e.g. unknown SHA.
    #[error("unprocessable request")]
    Unprocessable,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited {
        /// Optional `Retry-After` hint in seconds when available.
        retry_after_secs: Option<u64>,
    },

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of provider response.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Maps a non-2xx status code to a provider error.
    pub fn from_status(code: u16, retry_after_secs: Option<u64>) -> Self {
        match code {
            401 => ProviderError::Unauthorized,
            403 => ProviderError::Forbidden,
            404 => ProviderError::NotFound,
            422 => ProviderError::Unprocessable,
            429 => ProviderError::RateLimited { retry_after_secs },
            500..=599 => ProviderError::Server(code),
            _ => ProviderError::HttpStatus(code),
        }
    }
}

/// CI event errors.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event payload file could not be read.
    #[error("cannot read event payload {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The event payload is not valid JSON of the expected shape.
    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Base or head commit is missing from the event payload.
    #[error("missing base/head commit in {event} event payload")]
    MissingRefs { event: &'static str },
}

/// Configuration and setup errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Missing required provider access token.
    #[error("missing provider token")]
    MissingToken,

    /// Required environment variable is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// Repository slug is not of the form `owner/repo`.
    #[error("invalid repository '{0}', expected 'owner/repo'")]
    InvalidRepository(String),

    /// Invalid base API URL.
    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),
}

// ===== Conversions for `?` ergonomics at the crate root =====

impl From<reqwest::Error> for ChangeCollectorError {
    fn from(e: reqwest::Error) -> Self {
        ChangeCollectorError::Provider(ProviderError::from(e))
    }
}

// ===== Mapping from reqwest::Error into ProviderError =====

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }

        if let Some(status) = e.status() {
            return ProviderError::from_status(status.as_u16(), None);
        }

        if e.is_decode() {
            return ProviderError::InvalidResponse(e.to_string());
        }

        ProviderError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        assert!(matches!(ProviderError::from_status(401, None), ProviderError::Unauthorized));
        assert!(matches!(ProviderError::from_status(404, None), ProviderError::NotFound));
        assert!(matches!(ProviderError::from_status(422, None), ProviderError::Unprocessable));
        assert!(matches!(
            ProviderError::from_status(429, Some(30)),
            ProviderError::RateLimited { retry_after_secs: Some(30) }
        ));
        assert!(matches!(ProviderError::from_status(503, None), ProviderError::Server(503)));
        assert!(matches!(ProviderError::from_status(418, None), ProviderError::HttpStatus(418)));
    }

    #[test]
    fn patch_error_names_the_file() {
        let err = ChangeCollectorError::Patch {
            file: "src/lib.rs".into(),
            source: PatchMapError::LineOverflow { line_index: 3 },
        };
        assert_eq!(
            err.to_string(),
            "failed to map patch of src/lib.rs: line number overflow at line 3"
        );
    }
}
