//! Flow orchestration: validate input, build the prompt, call the provider,
//! extract sections.
//!
//! Each step runs strictly after the previous one and the first failure ends
//! the run. Input and registry errors surface before any network call.

use crate::config::{CombinedInputPolicy, FlowConfig, InputConfig, InputType, OutputType};
use crate::error::{FlowError, FlowResult};
use crate::llm::{ImageInput, LlmRequest, ProviderSource};
use crate::structured::{augment, extract, Sections};
use serde::Serialize;

/// Placeholder in the prompt template replaced by the user's text.
pub const INPUT_PLACEHOLDER: &str = "{{input}}";

const BYTES_PER_MB: usize = 1024 * 1024;

/// Input submitted for one flow run.
#[derive(Debug, Clone, Default)]
pub struct FlowRequest {
    pub image: Option<ImageInput>,
    pub text: Option<String>,
}

impl FlowRequest {
    /// Build a request; empty text counts as no text.
    pub fn new(image: Option<ImageInput>, text: Option<String>) -> Self {
        Self {
            image,
            text: text.filter(|t| !t.is_empty()),
        }
    }

    /// Check the request against the flow's declared input.
    pub fn validate(&self, input: &InputConfig) -> FlowResult<()> {
        let has_image = self.image.is_some();
        let has_text = self.text.as_deref().is_some_and(|t| !t.is_empty());

        match input.input_type {
            InputType::Camera | InputType::Upload => require(has_image, "Image")?,
            InputType::Text => require(has_text, "Text")?,
            InputType::CameraText | InputType::UploadText => match input.combined_policy {
                CombinedInputPolicy::Primary => require(has_image, "Image")?,
                CombinedInputPolicy::Either => require(has_image || has_text, "Image or text")?,
                CombinedInputPolicy::Both => {
                    require(has_image, "Image")?;
                    require(has_text, "Text")?;
                }
            },
        }

        if let Some(image) = &self.image {
            check_image(image, input)?;
        }
        Ok(())
    }
}

fn require(present: bool, modality: &str) -> FlowResult<()> {
    if present {
        Ok(())
    } else {
        Err(FlowError::MissingInput {
            modality: modality.to_string(),
        })
    }
}

fn check_image(image: &ImageInput, input: &InputConfig) -> FlowResult<()> {
    if !input
        .accepted_formats
        .iter()
        .any(|f| f.eq_ignore_ascii_case(&image.media_type))
    {
        return Err(FlowError::InvalidInput(format!(
            "image type {} is not accepted (accepted: {})",
            image.media_type,
            input.accepted_formats.join(", ")
        )));
    }
    let max_bytes = (input.max_file_size as usize).saturating_mul(BYTES_PER_MB);
    if image.decoded_len() > max_bytes {
        return Err(FlowError::InvalidInput(format!(
            "image is larger than {}MB",
            input.max_file_size
        )));
    }
    Ok(())
}

/// Result of one flow run, handed to whatever renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowOutcome {
    /// Raw model text, always present
    pub raw: String,
    /// Extracted sections; `None` when the flow is not `sections` or the
    /// reply could not be parsed
    pub sections: Option<Sections>,
    pub output_type: OutputType,
}

/// Substitute user text into the template and append section instructions.
pub fn build_prompt(template: &str, text: Option<&str>, keys: &[String]) -> String {
    let prompt = match text {
        Some(text) if !text.is_empty() => template.replace(INPUT_PLACEHOLDER, text),
        _ => template.to_string(),
    };
    augment(&prompt, keys)
}

/// Runs one configured flow against a provider source.
pub struct FlowRunner<'a> {
    config: &'a FlowConfig,
    providers: &'a dyn ProviderSource,
}

impl<'a> FlowRunner<'a> {
    pub fn new(config: &'a FlowConfig, providers: &'a dyn ProviderSource) -> Self {
        Self { config, providers }
    }

    /// Run the flow for one request.
    pub async fn run(&self, request: &FlowRequest) -> FlowResult<FlowOutcome> {
        let ai = &self.config.ai;

        request.validate(&self.config.input)?;

        let keys = ai.output.section_keys();
        let prompt = build_prompt(&ai.prompt, request.text.as_deref(), &keys);

        let provider = self.providers.resolve(&ai.provider)?;
        let llm_request = LlmRequest {
            prompt,
            system_prompt: ai.system_prompt.clone(),
            image: request.image.clone(),
            text: request.text.clone(),
            temperature: ai.temperature,
            max_tokens: ai.max_tokens,
            model: ai.model.clone(),
        };

        tracing::debug!(
            provider = provider.name(),
            model = %ai.model,
            has_image = llm_request.image.is_some(),
            "Dispatching flow request"
        );
        let response = provider.generate(&llm_request).await?;

        let sections = match ai.output.output_type {
            OutputType::Sections if !keys.is_empty() => {
                let sections = extract(&response.raw, &keys);
                if sections.is_none() {
                    tracing::warn!(
                        "Could not extract sections [{}] from {} reply; returning raw text only",
                        keys.join(", "),
                        provider.name()
                    );
                }
                sections
            }
            _ => None,
        };

        tracing::info!(
            "Flow '{}' completed ({} output, {} chars)",
            self.config.app.name,
            ai.output.output_type.as_str(),
            response.raw.len()
        );

        Ok(FlowOutcome {
            raw: response.raw,
            sections,
            output_type: ai.output.output_type,
        })
    }
}
