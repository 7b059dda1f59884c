//! The `frontstage run` command: one flow run from the terminal.

use super::types::OutputFormat;
use clap::builder::NonEmptyStringValueParser;
use clap::Args;
use frontstage_core::config::InputType;
use frontstage_core::{
    FlowConfig, FlowRequest, FlowRunner, ImageInput, OutputWriter, ProviderRegistry,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image file to send (camera and upload flows)
    #[arg(short, long)]
    pub image: Option<String>,

    /// Text input; use "-" to read it from stdin
    #[arg(short, long)]
    pub text: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the model named in the flow file
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub model: Option<String>,
}

/// Execute the run command.
pub async fn execute(args: RunArgs, flow_path: &Path) -> anyhow::Result<()> {
    let mut config = FlowConfig::load_from(flow_path)?;
    if let Some(model) = args.model {
        config.ai.model = model;
    }

    warn_unused_inputs(config.input.input_type, args.image.is_some(), args.text.is_some());

    let image = match &args.image {
        Some(path) => Some(load_image(&FlowConfig::expand_path(path)).await?),
        None => None,
    };
    let text = match args.text.as_deref() {
        Some("-") => Some(read_stdin().await?),
        Some(text) => Some(text.to_string()),
        None => None,
    };

    let request = FlowRequest::new(image, text);
    let registry = ProviderRegistry::new(config.providers.clone());
    let outcome = FlowRunner::new(&config, &registry).run(&request).await?;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = OutputWriter::new(sink, args.format.into(), true);
    writer.write_outcome(&outcome, &config.ai.output.sections)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("Result written to {}", path.display());
    }
    Ok(())
}

/// Read an image file; the format comes from the file extension.
pub async fn load_image(path: &Path) -> anyhow::Result<ImageInput> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| anyhow::anyhow!("Cannot tell image format of {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read image {}: {e}", path.display()))?;
    tracing::debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(ImageInput::from_bytes(&bytes, format))
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text.trim_end().to_string())
}

fn warn_unused_inputs(input_type: InputType, has_image: bool, has_text: bool) {
    if has_image && !input_type.takes_image() {
        tracing::warn!("Flow input is '{input_type}'; the image is sent but the flow does not ask for one");
    }
    if has_text && !input_type.takes_text() {
        tracing::warn!("Flow input is '{input_type}'; the text only fills {{{{input}}}} in the prompt");
    }
}
