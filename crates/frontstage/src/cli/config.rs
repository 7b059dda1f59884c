//! The `frontstage config` command for flow file management.

use clap::{Args, Subcommand};
use frontstage_core::FlowConfig;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for flow file management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the parsed flow
    Show,

    /// Show the flow file path
    Path,

    /// Write a starter flow file
    Init {
        /// Overwrite an existing flow file
        #[arg(long)]
        force: bool,
    },

    /// Check the flow file and report what it will do
    Validate,

    /// Print the browser-safe projection of the flow as JSON
    Client,
}

/// Starter flow written by `config init`.
pub const STARTER_FLOW: &str = r##"# Frontstage flow file

[app]
name = "Plant Doctor"
description = "Snap a photo of a plant and get a quick health check"

[input]
type = "camera"
label = "Take a photo of your plant"
instructions = "Fill the frame with leaves and stems"
camera_facing = "environment"
max_file_size = 10
accepted_formats = ["image/jpeg", "image/png", "image/webp"]

[ai]
# openai, anthropic or google
provider = "openai"
model = "gpt-4o-mini"
prompt = "Look at this plant and assess its health."
temperature = 0.7
max_tokens = 2048

[ai.output]
# raw, markdown or sections
type = "sections"
sections = [
  { key = "diagnosis", title = "Diagnosis", icon = "stethoscope" },
  { key = "care", title = "Care tips", icon = "droplet" },
]

[output]
style = "card"
share_enabled = false

[providers]
request_timeout_ms = 60000

# Keys default to OPENAI_API_KEY, ANTHROPIC_API_KEY and GOOGLE_API_KEY.
# [providers.openai]
# api_key = "${OPENAI_API_KEY}"
# base_url = "https://api.openai.com/v1"

[logging]
level = "info"
format = "pretty"
"##;

/// Execute the config command.
pub async fn execute(args: ConfigArgs, flow_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = FlowConfig::load_from(flow_path)?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", flow_path.display());
        }

        ConfigCommand::Init { force } => {
            init(flow_path, force)?;
            tracing::info!("Flow file created at: {}", flow_path.display());
            println!("Flow initialized at: {}", flow_path.display());
        }

        ConfigCommand::Validate => {
            let config = FlowConfig::load_from(flow_path)?;
            println!("{}", summary(&config));
        }

        ConfigCommand::Client => {
            let config = FlowConfig::load_from(flow_path)?;
            println!("{}", serde_json::to_string_pretty(&config.client_config())?);
        }
    }

    Ok(())
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Flow file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, STARTER_FLOW)?;
    Ok(())
}

/// One-paragraph description of a valid flow.
fn summary(config: &FlowConfig) -> String {
    let mut out = format!(
        "OK: '{}' takes {} input and asks {}/{} for {} output",
        config.app.name,
        config.input.input_type,
        config.ai.provider,
        config.ai.model,
        config.ai.output.output_type.as_str()
    );
    let keys = config.ai.output.section_keys();
    if !keys.is_empty() {
        out.push_str(&format!(" [{}]", keys.join(", ")));
    }
    if frontstage_core::llm::identity(&config.ai.provider).is_err() {
        out.push_str(&format!(
            "\nWarning: provider '{}' is not registered; runs will fail",
            config.ai.provider
        ));
    }
    out
}
