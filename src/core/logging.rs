//! Diagnostic logging
//!
//! Logs go to stderr so they never mix with command output on stdout. The
//! filter is taken from, in order: `CARCAT_LOG`, the `log_filter` config
//! key, then `warn`. `--verbose` raises the default to `debug`.

use std::io;

use miette::Diagnostic;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a filter directive, e.g. `carcat=debug`
pub const LOG_ENV: &str = "CARCAT_LOG";

#[derive(Debug, Error, Diagnostic)]
pub enum LoggingError {
    #[error("invalid log filter '{directive}': {message}")]
    #[diagnostic(code(carcat::logging), help("use a directive such as `warn` or `carcat=debug`"))]
    InvalidFilter { directive: String, message: String },
}

/// Pick the filter directive from env, config and the verbose flag
pub fn filter_directive(env: Option<String>, configured: Option<&str>, verbose: bool) -> String {
    if let Some(directive) = env.filter(|d| !d.trim().is_empty()) {
        return directive;
    }
    if verbose {
        return "debug".to_string();
    }
    configured.unwrap_or("warn").to_string()
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging(configured: Option<&str>, verbose: bool) -> Result<(), LoggingError> {
    let directive = filter_directive(std::env::var(LOG_ENV).ok(), configured, verbose);
    let filter = EnvFilter::try_new(&directive).map_err(|err| LoggingError::InvalidFilter {
        directive: directive.clone(),
        message: err.to_string(),
    })?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        assert_eq!(filter_directive(None, None, false), "warn");
        assert_eq!(filter_directive(None, Some("info"), false), "info");
        assert_eq!(filter_directive(None, Some("info"), true), "debug");
        assert_eq!(
            filter_directive(Some("carcat=trace".into()), Some("info"), true),
            "carcat=trace"
        );
        assert_eq!(filter_directive(Some("  ".into()), None, false), "warn");
    }

    #[test]
    fn test_init_is_repeatable() {
        init_logging(Some("warn"), false).unwrap();
        init_logging(Some("debug"), true).unwrap();
    }
}
