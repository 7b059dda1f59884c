//! Frontstage CLI - run declarative single-purpose AI flows.
//!
//! A flow file describes one input (photo, upload, text, or image + text),
//! one provider and prompt, and how the reply is shaped. This binary runs
//! that flow from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Run the flow in ./flow.toml against a photo
//! frontstage run --image plant.jpg
//!
//! # Text flow, JSON output
//! frontstage run --text "a rainy afternoon" --format json
//!
//! # Feed one input per line from stdin
//! cat prompts.txt | frontstage session
//!
//! # Scaffold a flow file
//! frontstage config init
//! ```

use clap::{Parser, Subcommand};
use frontstage_core::config::LoggingConfig;
use frontstage_core::FlowConfig;
use std::path::Path;

mod cli;
mod logging;

/// Frontstage - declarative single-purpose AI flows.
#[derive(Parser, Debug)]
#[command(name = "frontstage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Flow file (defaults to ./flow.toml, then the user config directory)
    #[arg(long, global = true, env = "FRONTSTAGE_FLOW")]
    flow: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the flow once
    Run(cli::run::RunArgs),

    /// Run the flow for every line read from stdin
    Session(cli::session::SessionArgs),

    /// View and manage the flow file
    Config(cli::config::ConfigArgs),

    /// List registered LLM providers
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let flow_path = match &cli.flow {
        Some(path) => FlowConfig::expand_path(path),
        None => FlowConfig::default_path(),
    };

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let logging_config = startup_logging(&flow_path);
    logging::init_from_config(&logging_config, cli.verbose, cli.json_logs);

    tracing::debug!("Frontstage v{}", frontstage_core::VERSION);
    tracing::debug!("Flow file: {}", flow_path.display());

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, &flow_path).await,
        Commands::Session(args) => cli::session::execute(args, &flow_path).await,
        Commands::Config(args) => cli::config::execute(args, &flow_path).await,
        Commands::Providers => cli::providers::execute(),
    }
}

/// Logging settings from the flow file, or defaults when it can't be used.
///
/// A missing file is expected before `config init`, so only a broken one
/// earns a warning.
fn startup_logging(flow_path: &Path) -> LoggingConfig {
    if !flow_path.exists() {
        return LoggingConfig::default();
    }
    match FlowConfig::load_from(flow_path) {
        Ok(config) => config.logging,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load flow file: {e}\n  \
                 Using default logging. Check the file with `frontstage config validate`."
            );
            LoggingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flow_flag_is_global() {
        let cli = Cli::try_parse_from(["frontstage", "providers", "--flow", "other.toml"]).unwrap();
        assert_eq!(cli.flow.as_deref(), Some("other.toml"));
    }

    #[test]
    fn test_missing_flow_file_uses_default_logging() {
        let dir = tempfile::tempdir().unwrap();
        let logging = startup_logging(&dir.path().join("absent.toml"));
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "pretty");
    }

    #[test]
    fn test_logging_read_from_flow_file() {
        let dir = tempfile::tempdir().unwrap();
        let path: std::path::PathBuf = dir.path().join("flow.toml");
        std::fs::write(
            &path,
            "[app]\nname = \"x\"\n\n[input]\ntype = \"text\"\n\n[ai]\nprovider = \"openai\"\nmodel = \"m\"\nprompt = \"p\"\n\n[ai.output]\ntype = \"raw\"\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
        )
        .unwrap();
        let logging = startup_logging(&path);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, "json");
    }
}
