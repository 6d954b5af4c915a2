//! Log initialization for the delivery server.
//!
//! Console output follows the level chosen on the command line; when a
//! logs directory is configured, a second append-mode layer keeps a
//! debug-level record on disk for post-mortem inspection.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::Result;

/// Console log levels selectable from the CLI.
///
/// Parsing and help text come from clap's `ValueEnum` derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliLogLevel {
    /// Filter directive for the console layer.
    fn directive(self) -> &'static str {
        match self {
            CliLogLevel::Error => "error",
            CliLogLevel::Warn => "warn",
            CliLogLevel::Info => "info",
            CliLogLevel::Debug => "debug",
            CliLogLevel::Trace => "trace",
        }
    }
}

/// Installs the global subscriber.
///
/// A `RUST_LOG` environment variable overrides `level` for the console
/// layer. The file layer, when `logs_dir` is given, always records at
/// debug and appends to `minbar.log` across runs.
///
/// # Errors
///
/// - `MinbarError::Io` - Logs directory or log file could not be created
pub fn init_tracing(level: CliLogLevel, logs_dir: Option<&Path>) -> Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let console = fmt::layer().with_target(false).with_filter(console_filter);

    let file = match logs_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("minbar.log"))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(log_file)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::*;

    #[test]
    fn test_level_directives() {
        assert_eq!(CliLogLevel::Error.directive(), "error");
        assert_eq!(CliLogLevel::Info.directive(), "info");
        assert_eq!(CliLogLevel::Trace.directive(), "trace");
    }

    #[test]
    fn test_levels_parse_from_cli_strings() {
        assert_eq!(
            CliLogLevel::from_str("warn", true).unwrap(),
            CliLogLevel::Warn
        );
        assert_eq!(
            CliLogLevel::from_str("DEBUG", true).unwrap(),
            CliLogLevel::Debug
        );
        assert!(CliLogLevel::from_str("verbose", true).is_err());
    }
}
