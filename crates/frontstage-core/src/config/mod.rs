//! Flow configuration.
//!
//! A flow is described by a single TOML file (`flow.toml` by default). The
//! parsed file is treated as an immutable snapshot: request handling only
//! ever reads it, and [`ConfigStore`] swaps in a fresh snapshot when the file
//! changes on disk.

mod client;
mod store;
mod types;
mod validate;

pub use client::{ClientApp, ClientBrand, ClientConfig, ClientInput, ClientOutput};
pub use store::ConfigStore;
pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const FLOW_FILE_NAME: &str = "flow.toml";

/// Root configuration structure for one flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Application identity
    pub app: AppConfig,

    /// Input modality and constraints
    pub input: InputConfig,

    /// Provider, model, prompt and output shape
    pub ai: AiConfig,

    /// Presentation settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Provider credentials and endpoints
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FlowConfig {
    /// Load the flow from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Load the flow from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a flow from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FlowConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default flow file path.
    ///
    /// Prefers `./flow.toml`; otherwise the platform config directory:
    /// - macOS: ~/Library/Application Support/ai.frontstage.frontstage/flow.toml
    /// - Linux: ~/.config/frontstage/flow.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\frontstage\config\flow.toml
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(FLOW_FILE_NAME);
        if local.exists() {
            return local;
        }
        directories::ProjectDirs::from("ai", "frontstage", "frontstage")
            .map(|dirs| dirs.config_dir().join(FLOW_FILE_NAME))
            .unwrap_or(local)
    }

    /// Expand `~` in a user-supplied flow path.
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).into_owned())
    }

    /// Sanitized projection safe to hand to a browser.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::from(self)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
