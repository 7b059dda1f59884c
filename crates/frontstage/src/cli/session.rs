//! The `frontstage session` command: one flow run per stdin line.
//!
//! The flow file is re-read through [`ConfigStore`] before each line, so
//! edits to the prompt or provider apply to the next input without a restart.

use super::run::load_image;
use super::types::OutputFormat;
use clap::Args;
use frontstage_core::{
    ConfigStore, FlowConfig, FlowOutcome, FlowRequest, FlowRunner, ImageInput, OutputWriter,
    ProviderRegistry, ProviderSource,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Arguments for the `session` command.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "jsonl")]
    pub format: OutputFormat,

    /// Image file attached to every line (combined image + text flows)
    #[arg(short, long)]
    pub image: Option<String>,
}

/// One output record per input line in JSON formats.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord<'a> {
    line: usize,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a FlowOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Counts reported when stdin closes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub succeeded: usize,
    pub failed: usize,
}

/// Execute the session command.
pub async fn execute(args: SessionArgs, flow_path: &Path) -> anyhow::Result<()> {
    let store = ConfigStore::new(flow_path);
    // Fail fast on a broken flow file rather than once per line.
    store.load()?;

    let image = match &args.image {
        Some(path) => Some(load_image(&FlowConfig::expand_path(path)).await?),
        None => None,
    };

    let mut writer = OutputWriter::new(std::io::stdout(), args.format.into(), false);
    let input = BufReader::new(tokio::io::stdin());
    let registry_for = |config: &FlowConfig| -> Box<dyn ProviderSource> {
        Box::new(ProviderRegistry::new(config.providers.clone()))
    };

    let stats = run_session(input, &store, image.as_ref(), &mut writer, &registry_for).await?;
    tracing::info!(
        "Session finished: {} succeeded, {} failed",
        stats.succeeded,
        stats.failed
    );
    Ok(())
}

/// Run the flow once per non-blank line of `input`.
///
/// Flow and configuration errors are reported per line and do not end the
/// session; only I/O failures on the input or output streams do.
pub async fn run_session<R, W>(
    input: R,
    store: &ConfigStore,
    image: Option<&ImageInput>,
    writer: &mut OutputWriter<W>,
    sources: &dyn Fn(&FlowConfig) -> Box<dyn ProviderSource>,
) -> anyhow::Result<SessionStats>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut stats = SessionStats::default();
    let mut lines = input.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let result = match store.load() {
            Ok(config) => {
                let source = sources(&config);
                let request = FlowRequest::new(image.cloned(), Some(text.to_string()));
                let outcome = FlowRunner::new(&config, source.as_ref()).run(&request).await;
                outcome
                    .map(|outcome| (outcome, config))
                    .map_err(anyhow::Error::from)
            }
            Err(e) => Err(anyhow::Error::from(e)),
        };

        match result {
            Ok((outcome, config)) => {
                stats.succeeded += 1;
                if writes_records(writer) {
                    writer.write_json(&SessionRecord {
                        line: line_no,
                        input: text,
                        outcome: Some(&outcome),
                        error: None,
                    })?;
                } else {
                    writer.write_outcome(&outcome, &config.ai.output.sections)?;
                }
            }
            Err(e) => {
                stats.failed += 1;
                tracing::error!("Line {line_no}: {e}");
                if writes_records(writer) {
                    writer.write_json(&SessionRecord {
                        line: line_no,
                        input: text,
                        outcome: None,
                        error: Some(e.to_string()),
                    })?;
                }
            }
        }
        writer.flush()?;
    }

    Ok(stats)
}

fn writes_records<W: Write>(writer: &OutputWriter<W>) -> bool {
    writer.format() != frontstage_core::OutputFormat::Text
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use frontstage_core::{FlowError, LlmProvider, LlmRequest, LlmResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TEXT_FLOW: &str = r#"
[app]
name = "Haiku"

[input]
type = "text"

[ai]
provider = "echo"
model = "test-model"
prompt = "Write about {{input}}"

[ai.output]
type = "sections"
sections = [{ key = "poem", title = "Poem" }]
"#;

    /// Replies with the prompt's user text as a `poem` section, or fails on "boom".
    struct EchoProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, FlowError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = request.text.clone().unwrap_or_default();
            if text == "boom" {
                return Err(FlowError::Provider {
                    provider: "echo".into(),
                    message: "upstream exploded".into(),
                    status_code: Some(500),
                });
            }
            Ok(LlmResponse {
                raw: format!("{{\"poem\": \"{text}\"}}"),
            })
        }
    }

    struct EchoSource {
        calls: Arc<AtomicUsize>,
    }

    impl ProviderSource for EchoSource {
        fn resolve(&self, _identifier: &str) -> Result<Box<dyn LlmProvider>, FlowError> {
            Ok(Box::new(EchoProvider {
                calls: self.calls.clone(),
            }))
        }
    }

    async fn session(input: &str, format: OutputFormat) -> (String, SessionStats, usize) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.toml");
        std::fs::write(&path, TEXT_FLOW).unwrap();
        let store = ConfigStore::new(&path);

        let calls = Arc::new(AtomicUsize::new(0));
        let sources = |_: &FlowConfig| -> Box<dyn ProviderSource> {
            Box::new(EchoSource {
                calls: calls.clone(),
            })
        };

        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, format.into(), false);
        let stats = run_session(input.as_bytes(), &store, None, &mut writer, &sources)
            .await
            .unwrap();
        drop(writer);

        (
            String::from_utf8(buffer).unwrap(),
            stats,
            calls.load(Ordering::SeqCst),
        )
    }

    #[tokio::test]
    async fn test_one_record_per_line() {
        let (output, stats, calls) = session("moss\n\nrain\n", OutputFormat::Jsonl).await;
        assert_eq!(stats, SessionStats { succeeded: 2, failed: 0 });
        assert_eq!(calls, 2);

        let records: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["line"], 1);
        assert_eq!(records[0]["outcome"]["sections"]["poem"], "moss");
        assert_eq!(records[1]["line"], 3);
        assert_eq!(records[1]["input"], "rain");
    }

    #[tokio::test]
    async fn test_failed_line_does_not_end_session() {
        let (output, stats, _) = session("boom\nfern\n", OutputFormat::Jsonl).await;
        assert_eq!(stats, SessionStats { succeeded: 1, failed: 1 });

        let records: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert!(records[0]["error"]
            .as_str()
            .unwrap()
            .contains("upstream exploded"));
        assert!(records[0].get("outcome").is_none());
        assert_eq!(records[1]["outcome"]["raw"], "{\"poem\": \"fern\"}");
    }

    #[tokio::test]
    async fn test_text_format_renders_sections() {
        let (output, stats, _) = session("ivy\n", OutputFormat::Text).await;
        assert_eq!(stats.succeeded, 1);
        assert_eq!(output, "## Poem\n\nivy\n");
    }

    #[tokio::test]
    async fn test_missing_flow_file_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("absent.toml"));
        let sources = |_: &FlowConfig| -> Box<dyn ProviderSource> {
            Box::new(EchoSource {
                calls: Arc::new(AtomicUsize::new(0)),
            })
        };

        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Jsonl.into(), false);
        let stats = run_session("a\n".as_bytes(), &store, None, &mut writer, &sources)
            .await
            .unwrap();
        assert_eq!(stats, SessionStats { succeeded: 0, failed: 1 });
    }
}
