// Logging module - Logging infrastructure
use crate::domain::error::{SerialComError, SerialComResult};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where diagnostic logs go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; used while the terminal UI owns the screen
    File(PathBuf),
    Disabled,
}

/// Normalise a configured level name; unknown names fall back to info
fn level_directive(log_level: &str, verbose: bool) -> &'static str {
    if verbose {
        return "debug";
    }
    match log_level.to_ascii_lowercase().as_str() {
        "error" => "error",
        "warn" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    }
}

/// Initialize logging system. `RUST_LOG` overrides the configured level.
pub fn init_logging(log_level: &str, verbose: bool, target: LogTarget) -> SerialComResult<()> {
    let directive = format!("serialcom={},warn", level_directive(log_level, verbose));
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match target {
        LogTarget::Disabled => return Ok(()),
        LogTarget::Stderr => registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .with_level(true),
            )
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| SerialComError::FileOpen { path, source })?;
            registry
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .try_init()
        }
    };

    result.map_err(|e| SerialComError::Configuration(format!("Failed to initialize logging: {}", e)))?;
    tracing::debug!("SerialCom logging system initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("WARN", false), "warn");
        assert_eq!(level_directive("bogus", false), "info");
        assert_eq!(level_directive("error", true), "debug");
    }

    #[test]
    fn test_disabled_logging_is_noop() {
        assert!(init_logging("info", false, LogTarget::Disabled).is_ok());
    }
}
