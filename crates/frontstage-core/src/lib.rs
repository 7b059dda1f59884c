//! Frontstage Core - declarative single-purpose AI flows.
//!
//! A flow collects one input (photo, uploaded image, text, or image + text),
//! sends it to one LLM provider with a templated prompt, and returns the reply
//! as raw text, markdown, or a fixed set of named sections.
//!
//! # Architecture
//!
//! ```text
//! FlowRequest → validate → build prompt (+ JSON instructions) → provider → extract → FlowOutcome
//! ```
//!
//! Providers (OpenAI, Anthropic, Google) sit behind one [`LlmProvider`] trait
//! and are looked up by identifier through the [`ProviderRegistry`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use frontstage_core::{FlowConfig, FlowRequest, FlowRunner, ProviderRegistry};
//!
//! #[tokio::main]
//! async fn main() -> frontstage_core::Result<()> {
//!     let config = FlowConfig::load()?;
//!     let registry = ProviderRegistry::new(config.providers.clone());
//!     let request = FlowRequest::new(None, Some("a sunny day in Lisbon".into()));
//!
//!     let outcome = FlowRunner::new(&config, &registry).run(&request).await?;
//!     println!("{:?}", outcome.sections);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod flow;
pub mod llm;
pub mod output;
pub mod structured;

// Re-exports for convenient access
pub use config::{ClientConfig, ConfigStore, FlowConfig};
pub use error::{ConfigError, FlowError, FlowResult, FrontstageError, Result};
pub use flow::{FlowOutcome, FlowRequest, FlowRunner};
pub use llm::{ImageInput, LlmProvider, LlmRequest, LlmResponse, ProviderRegistry, ProviderSource};
pub use output::{OutputFormat, OutputWriter};
pub use structured::{augment, extract, Sections};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
