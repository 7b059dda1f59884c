//! Anthropic LLM provider using the Messages API.
//!
//! Sends image + prompt as base64 content blocks, image first.

use super::provider::{status_error, transport_error, LlmProvider, LlmRequest, LlmResponse};
use crate::error::FlowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub(crate) const NAME: &str = "anthropic";

const API_VERSION: &str = "2023-06-01";

/// Anthropic provider using the Messages API.
pub struct AnthropicProvider {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
}

impl AnthropicProvider {
    /// Create a provider for `{base_url}/messages`.
    pub fn new(api_key: &str, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_key: api_key.to_string(),
            client,
            endpoint: format!("{}/messages", base_url.trim_end_matches('/')),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentBlock<'a> {
    #[serde(rename = "image")]
    Image { source: ImageSource<'a> },
    #[serde(rename = "text")]
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'a str,
    data: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

fn build_request(request: &LlmRequest) -> MessagesRequest<'_> {
    let mut content = Vec::with_capacity(2);
    // Image goes before the text block
    if let Some(image) = &request.image {
        content.push(ContentBlock::Image {
            source: ImageSource {
                source_type: "base64",
                media_type: &image.media_type,
                data: &image.data,
            },
        });
    }
    content.push(ContentBlock::Text {
        text: &request.prompt,
    });

    MessagesRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        system: request.system_prompt.as_deref(),
        messages: vec![Message {
            role: "user",
            content,
        }],
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, FlowError> {
        let start = Instant::now();
        let body = build_request(request);

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(NAME, e))?;

        if !resp.status().is_success() {
            return Err(status_error(NAME, resp).await);
        }

        let messages_resp: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| FlowError::provider(NAME, format!("failed to parse response: {e}")))?;

        tracing::debug!(
            model = %request.model,
            tokens = ?messages_resp.usage.as_ref().map(|u| u.input_tokens + u.output_tokens),
            latency_ms = start.elapsed().as_millis() as u64,
            "Anthropic call complete"
        );

        // Output may be split across several text blocks
        let raw = messages_resp
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(LlmResponse { raw })
    }
}
