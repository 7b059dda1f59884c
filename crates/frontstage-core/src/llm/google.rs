//! Google Gemini provider using the `generateContent` REST endpoint.

use super::provider::{status_error, transport_error, LlmProvider, LlmRequest, LlmResponse};
use crate::error::FlowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub(crate) const NAME: &str = "google";

/// Google Generative Language API provider.
pub struct GoogleProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl GoogleProvider {
    /// Create a provider for `{base_url}/models/{model}:generateContent`.
    pub fn new(api_key: &str, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_key: api_key.to_string(),
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The model goes in as one percent-encoded path segment, so `/`, `?`
    /// or `#` in a model name cannot change the request target.
    fn endpoint(&self, model: &str) -> Result<reqwest::Url, FlowError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| FlowError::provider(NAME, format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| FlowError::provider(NAME, "base URL cannot take a path"))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{model}:generateContent"));
        Ok(url)
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

fn build_request(request: &LlmRequest) -> GenerateRequest<'_> {
    let mut parts = vec![Part::Text {
        text: &request.prompt,
    }];
    if let Some(image) = &request.image {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: &image.media_type,
                data: &image.data,
            },
        });
    }

    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config: GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        },
        system_instruction: request.system_prompt.as_deref().map(|text| SystemInstruction {
            parts: vec![Part::Text { text }],
        }),
    }
}

impl GenerateResponse {
    /// Text of the first candidate, all text parts concatenated.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, FlowError> {
        let start = Instant::now();
        let body = build_request(request);

        let resp = self
            .client
            .post(self.endpoint(&request.model)?)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(NAME, e))?;

        if !resp.status().is_success() {
            return Err(status_error(NAME, resp).await);
        }

        let generate_resp: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| FlowError::provider(NAME, format!("failed to parse response: {e}")))?;

        tracing::debug!(
            model = %request.model,
            tokens = ?generate_resp.usage_metadata.as_ref().and_then(|u| u.total_token_count),
            latency_ms = start.elapsed().as_millis() as u64,
            "Google call complete"
        );

        Ok(LlmResponse {
            raw: generate_resp.into_text(),
        })
    }
}
