//! Client side of the remote test-impact analysis service.
//!
//! - [`config`]: endpoint/timeout loaded from environment-style variables
//! - [`services::test_wiser_service`]: HTTP transport for the change payload
//! - [`error_handler`]: unified error type and lookup/validation helpers
//! - [`telemetry`]: tracing layer and filters shared by the workspace binary

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::service_config::AnalysisServiceConfig;
pub use error_handler::{AnalysisError, ConfigError};
pub use services::test_wiser_service::AnalysisClient;
