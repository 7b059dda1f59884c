//! Provider registry: identifier string to adapter.
//!
//! The set of providers is a static table. Every resolution builds a fresh
//! adapter from the process-wide provider settings; construction reads
//! credentials and never touches the network.

use super::anthropic::AnthropicProvider;
use super::google::GoogleProvider;
use super::openai::OpenAiProvider;
use super::provider::{http_client, resolve_env_var, LlmProvider};
use super::{anthropic, google, openai};
use crate::config::{ProviderEndpoint, ProvidersConfig};
use crate::error::FlowError;
use std::time::Duration;

/// Vendors with a registered adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
}

/// Lookup metadata for one provider. Carries no behavior.
#[derive(Debug, Clone, Copy)]
pub struct ProviderIdentity {
    pub kind: ProviderKind,
    /// Identifier used in flow files
    pub id: &'static str,
    /// Human-readable vendor name
    pub display_name: &'static str,
    /// Environment variable holding the key when none is configured
    pub key_env: &'static str,
    /// Public API base URL
    pub default_base_url: &'static str,
}

/// Every provider the registry knows about, in listing order.
pub const PROVIDERS: &[ProviderIdentity] = &[
    ProviderIdentity {
        kind: ProviderKind::OpenAi,
        id: openai::NAME,
        display_name: "OpenAI",
        key_env: "OPENAI_API_KEY",
        default_base_url: "https://api.openai.com/v1",
    },
    ProviderIdentity {
        kind: ProviderKind::Anthropic,
        id: anthropic::NAME,
        display_name: "Anthropic",
        key_env: "ANTHROPIC_API_KEY",
        default_base_url: "https://api.anthropic.com/v1",
    },
    ProviderIdentity {
        kind: ProviderKind::Google,
        id: google::NAME,
        display_name: "Google Gemini",
        key_env: "GOOGLE_API_KEY",
        default_base_url: "https://generativelanguage.googleapis.com/v1beta",
    },
];

/// Identifiers of every registered provider.
pub fn known_identifiers() -> Vec<String> {
    PROVIDERS.iter().map(|p| p.id.to_string()).collect()
}

/// Look up a provider identity, failing closed on unknown identifiers.
pub fn identity(identifier: &str) -> Result<&'static ProviderIdentity, FlowError> {
    PROVIDERS
        .iter()
        .find(|p| p.id == identifier)
        .ok_or_else(|| FlowError::UnknownProvider {
            identifier: identifier.to_string(),
            known: known_identifiers(),
        })
}

/// Anything that can turn a provider identifier into an adapter.
///
/// Orchestration depends on this rather than on [`ProviderRegistry`] so
/// tests can substitute scripted providers.
pub trait ProviderSource: Send + Sync {
    fn resolve(&self, identifier: &str) -> Result<Box<dyn LlmProvider>, FlowError>;
}

/// The production registry, backed by [`PROVIDERS`].
pub struct ProviderRegistry {
    config: ProvidersConfig,
}

impl ProviderRegistry {
    pub fn new(config: ProvidersConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self, kind: ProviderKind) -> &ProviderEndpoint {
        match kind {
            ProviderKind::OpenAi => &self.config.openai,
            ProviderKind::Anthropic => &self.config.anthropic,
            ProviderKind::Google => &self.config.google,
        }
    }
}

impl ProviderSource for ProviderRegistry {
    fn resolve(&self, identifier: &str) -> Result<Box<dyn LlmProvider>, FlowError> {
        let identity = identity(identifier)?;
        let endpoint = self.endpoint(identity.kind);

        let key_ref = endpoint
            .api_key
            .clone()
            .unwrap_or_else(|| format!("${{{}}}", identity.key_env));
        let api_key = resolve_env_var(&key_ref).ok_or_else(|| {
            FlowError::provider(
                identity.id,
                format!(
                    "{} API key not set. Set {} env var.",
                    identity.display_name, identity.key_env
                ),
            )
        })?;
        let base_url = endpoint
            .base_url
            .as_deref()
            .unwrap_or(identity.default_base_url);
        let client = http_client(
            identity.id,
            Duration::from_millis(self.config.request_timeout_ms),
        )?;

        tracing::debug!("Resolved provider {} at {}", identity.id, base_url);

        Ok(match identity.kind {
            ProviderKind::OpenAi => Box::new(OpenAiProvider::new(&api_key, base_url, client)),
            ProviderKind::Anthropic => Box::new(AnthropicProvider::new(&api_key, base_url, client)),
            ProviderKind::Google => Box::new(GoogleProvider::new(&api_key, base_url, client)),
        })
    }
}
