//! LLM integration.
//!
//! Provides a provider abstraction over three multimodal chat APIs (OpenAI
//! Chat Completions, Anthropic Messages, Google generateContent) and the
//! registry that selects one by identifier.

pub(crate) mod anthropic;
pub(crate) mod google;
pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod registry;

pub use anthropic::AnthropicProvider;
pub use google::GoogleProvider;
pub use openai::OpenAiProvider;
pub use provider::{media_type_for, resolve_env_var, ImageInput, LlmProvider, LlmRequest, LlmResponse};
pub use registry::{
    identity, known_identifiers, ProviderIdentity, ProviderKind, ProviderRegistry, ProviderSource,
    PROVIDERS,
};
