//! Logging initialization.
//!
//! Logs go to stderr; stdout carries flow results only.

use frontstage_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the flow file's `[logging]` table plus CLI flags.
pub fn init_from_config(config: &LoggingConfig, verbose: bool, json_logs: bool) {
    let (level, json_format) = resolve(config, verbose, json_logs);
    init(level, json_format);
}

/// Effective filter level and format.
fn resolve(config: &LoggingConfig, verbose: bool, json_logs: bool) -> (&str, bool) {
    let level = match config.level.as_str() {
        _ if verbose => "debug",
        "error" | "warn" | "info" | "debug" | "trace" => config.level.as_str(),
        other => {
            eprintln!("Warning: Unknown log level '{other}', using info");
            "info"
        }
    };
    (level, json_logs || config.format == "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str, format: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_verbose_forces_debug() {
        assert_eq!(resolve(&config("warn", "pretty"), true, false), ("debug", false));
    }

    #[test]
    fn test_config_level_and_format() {
        assert_eq!(resolve(&config("trace", "json"), false, false), ("trace", true));
        assert_eq!(resolve(&config("info", "pretty"), false, true), ("info", true));
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        assert_eq!(resolve(&config("loud", "pretty"), false, false), ("info", false));
    }
}
