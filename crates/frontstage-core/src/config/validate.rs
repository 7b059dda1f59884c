//! Configuration validation with range and consistency checks.

use crate::error::ConfigError;
use std::collections::HashSet;

use super::{FlowConfig, OutputType};

impl FlowConfig {
    /// Validate configuration values are within acceptable ranges.
    ///
    /// The provider identifier is not checked here; the registry rejects
    /// unknown identifiers when a flow runs.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "app.name must not be empty".into(),
            ));
        }
        if self.ai.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ai.model must not be empty".into(),
            ));
        }
        if self.ai.prompt.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ai.prompt must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(ConfigError::ValidationError(
                "ai.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.ai.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "ai.max_tokens must be > 0".into(),
            ));
        }
        if self.input.max_file_size == 0 {
            return Err(ConfigError::ValidationError(
                "input.max_file_size must be > 0".into(),
            ));
        }
        if let Some(format) = self
            .input
            .accepted_formats
            .iter()
            .find(|f| !f.starts_with("image/"))
        {
            return Err(ConfigError::ValidationError(format!(
                "input.accepted_formats entry '{format}' is not an image MIME type"
            )));
        }
        if self.providers.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "providers.request_timeout_ms must be > 0".into(),
            ));
        }
        self.validate_sections()
    }

    fn validate_sections(&self) -> Result<(), ConfigError> {
        if self.ai.output.output_type != OutputType::Sections {
            return Ok(());
        }
        if self.ai.output.sections.is_empty() {
            return Err(ConfigError::ValidationError(
                "ai.output.sections must list at least one section for sections output".into(),
            ));
        }
        let mut seen = HashSet::new();
        for section in &self.ai.output.sections {
            if section.key.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "ai.output.sections keys must not be empty".into(),
                ));
            }
            if !seen.insert(section.key.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "ai.output.sections key '{}' is duplicated",
                    section.key
                )));
            }
        }
        Ok(())
    }
}
