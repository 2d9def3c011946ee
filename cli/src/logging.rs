//! Diagnostic logging to stderr.

use std::io::IsTerminal;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LogLevel;

/// Level used when `RUST_LOG` is unset.
///
/// `-q` wins over `-v`; either wins over the configured level.
pub fn default_level(verbose: u8, quiet: bool, configured: Option<LogLevel>) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => match configured {
            Some(LogLevel::Error) => LevelFilter::ERROR,
            Some(LogLevel::Warn) | None => LevelFilter::WARN,
            Some(LogLevel::Info) => LevelFilter::INFO,
            Some(LogLevel::Debug) => LevelFilter::DEBUG,
            Some(LogLevel::Trace) => LevelFilter::TRACE,
        },
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init(verbose: u8, quiet: bool, configured: Option<LogLevel>) {
    let level = default_level(verbose, quiet, configured);
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
    tracing::debug!(%level, "Logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(0, false, None), LevelFilter::WARN);
        assert_eq!(
            default_level(0, false, Some(LogLevel::Debug)),
            LevelFilter::DEBUG
        );
        assert_eq!(
            default_level(1, false, Some(LogLevel::Error)),
            LevelFilter::INFO
        );
        assert_eq!(default_level(2, false, None), LevelFilter::DEBUG);
        assert_eq!(default_level(7, false, None), LevelFilter::TRACE);
        assert_eq!(default_level(3, true, None), LevelFilter::ERROR);
    }
}
