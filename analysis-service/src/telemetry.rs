use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Targets (crate names) of the workspace. Events from other crates are not
/// rendered by [`layer`].
pub const WORKSPACE_TARGETS: &[&str] = &[
    "test_wiser",
    "change_collector",
    "analysis_service",
    "patch_mapper",
];

/// Prefix put in front of every rendered event, mirroring the action name.
pub const LOG_HEADER: &str = "[Test Wiser]";

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `[Test Wiser] 2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct HeaderedRfc3339Utc;

impl FormatTime for HeaderedRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        // Keep timestamps compact: no fractional seconds, Z-suffix
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&format!("{LOG_HEADER} {s}"))
    }
}

/// Returns `true` if `target` belongs to one of the workspace crates.
pub fn is_workspace_target(target: &str) -> bool {
    WORKSPACE_TARGETS.iter().any(|p| {
        target
            .strip_prefix(p)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Build a formatting layer that renders ONLY events emitted by workspace crates.
///
/// - `[Test Wiser]` header and RFC3339 UTC timestamps
/// - Compact single-line format with target
/// - Span close events (duration at the end of spans)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    let only_workspace = filter::filter_fn(|meta| is_workspace_target(meta.target()));

    fmt::layer()
        .with_ansi(use_ansi)
        // Log span close to get durations for instrumented functions
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(
            fmt::format()
                .compact()
                .with_timer(HeaderedRfc3339Utc)
                .with_level(true)
                .with_target(true),
        )
        .with_filter(only_workspace)
}

/// Level directives for every workspace crate, e.g. `patch_mapper=debug`.
pub fn level_directives(level: Level) -> Vec<Directive> {
    let level = level.as_str().to_lowercase();
    WORKSPACE_TARGETS
        .iter()
        .filter_map(|t| Directive::from_str(&format!("{t}={level}")).ok())
        .collect()
}

/// Create an EnvFilter from `RUST_LOG` or fallback `default`, then raise the
/// workspace crates to `level`.
///
/// Example: `default = "warn"`, `level = Level::DEBUG` shows warnings from
/// dependencies and debug output from the workspace.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    level_directives(level)
        .into_iter()
        .fold(base, |f, d| f.add_directive(d))
}

/// GitHub runners set `RUNNER_DEBUG=1` when step debug logging is enabled.
pub fn runner_debug_enabled<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup("RUNNER_DEBUG").is_some_and(|v| v.trim() == "1")
}
