//! OpenAI LLM provider using the Chat Completions API.
//!
//! Sends the image via data URL in the user message content array.

use super::provider::{status_error, transport_error, LlmProvider, LlmRequest, LlmResponse};
use crate::error::FlowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub(crate) const NAME: &str = "openai";

/// OpenAI provider using Chat Completions API.
///
/// Not `Debug`: the struct holds the API key.
pub struct OpenAiProvider {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiProvider {
    /// Create a provider for `{base_url}/chat/completions`.
    pub fn new(api_key: &str, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_key: api_key.to_string(),
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ChatContent<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent<'a> {
    #[serde(rename = "text")]
    Text { text: &'a str },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

fn build_request(request: &LlmRequest) -> ChatRequest<'_> {
    let mut content = vec![ChatContent::Text {
        text: &request.prompt,
    }];
    if let Some(image) = &request.image {
        content.push(ChatContent::ImageUrl {
            image_url: ImageUrl {
                url: image.data_url(),
                detail: "high",
            },
        });
    }

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system_prompt {
        messages.push(ChatMessage {
            role: "system",
            content: MessageContent::Text(system),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: MessageContent::Parts(content),
    });

    ChatRequest {
        model: &request.model,
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, FlowError> {
        let start = Instant::now();
        let body = build_request(request);

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(NAME, e))?;

        if !resp.status().is_success() {
            return Err(status_error(NAME, resp).await);
        }

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| FlowError::provider(NAME, format!("failed to parse response: {e}")))?;

        tracing::debug!(
            model = %request.model,
            tokens = ?chat_resp.usage.as_ref().map(|u| u.total_tokens),
            latency_ms = start.elapsed().as_millis() as u64,
            "OpenAI call complete"
        );

        let raw = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        Ok(LlmResponse { raw })
    }
}
