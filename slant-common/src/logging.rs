//! Logging utilities for Slant binaries.
//!
//! Provides structured JSON or pretty logging with run IDs for tracing a
//! batch of article analyses end to end.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Modules that should be filtered to warn level.
///
/// Rayon's worker threads log at debug level on startup, which drowns out
/// per-article events in batch runs.
pub const NOISY_MODULES: &[&str] = &["rayon", "rayon_core"];

/// Build the default EnvFilter with noise suppression.
fn build_filter(log_level: &str, excluded_targets: &[String]) -> EnvFilter {
    // Try environment variable first (allows override)
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = String::from(log_level);

    for module in NOISY_MODULES {
        directives.push_str(&format!(",{}=warn", module));
    }

    for target in excluded_targets {
        directives.push_str(&format!(",{}=warn", target));
    }

    EnvFilter::new(&directives)
}

/// Initialize logging with the given configuration.
///
/// # Arguments
///
/// * `log_level` - Base log level (trace, debug, info, warn, error)
/// * `log_format` - Output format: "json" for structured JSON, "pretty" for human-readable
///
/// `RUST_LOG` overrides the level when set. Logs go to stderr so that JSON
/// profiles printed on stdout stay machine readable.
pub fn init_logging(log_level: &str, log_format: &str) {
    init_logging_with_exclusions(log_level, log_format, &[]);
}

/// Initialize logging with custom excluded targets.
///
/// Like `init_logging`, but allows specifying additional modules to exclude.
pub fn init_logging_with_exclusions(
    log_level: &str,
    log_format: &str,
    excluded_targets: &[String],
) {
    let filter = build_filter(log_level, excluded_targets);
    let subscriber = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::debug!(
        log_level = %log_level,
        log_format = %log_format,
        noise_filtered = NOISY_MODULES.len() + excluded_targets.len(),
        "Logging initialized"
    );
}

/// Generate a new run ID for a batch of analyses.
pub fn generate_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Create a tracing span for one article analysis.
///
/// # Example
///
/// ```ignore
/// let span = article_span!(run_id, url = %article.url);
/// let _enter = span.enter();
/// ```
#[macro_export]
macro_rules! article_span {
    ($run_id:expr) => {
        tracing::info_span!("article", run_id = %$run_id)
    };
    ($run_id:expr, $($field:tt)*) => {
        tracing::info_span!("article", run_id = %$run_id, $($field)*)
    };
}
