/// Configuration for calls to the remote analysis service.
///
/// # Fields
///
/// - `endpoint`: Full URL the change payload is POSTed to.
/// - `timeout_secs`: Request timeout in seconds.
///
/// # Examples
///
/// ```
/// use analysis_service::config::service_config::AnalysisServiceConfig;
///
/// let cfg = AnalysisServiceConfig {
///     endpoint: "https://analysis.example.test/".to_string(),
///     timeout_secs: 30,
/// };
/// assert!(cfg.endpoint.starts_with("https://"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisServiceConfig {
    /// Service URL (must start with `http://` or `https://`).
    pub endpoint: String,

    /// Request timeout (in seconds).
    pub timeout_secs: u64,
}
