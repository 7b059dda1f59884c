//! Error types for Frontstage flows.
//!
//! Errors are split by layer: configuration problems are reported before a
//! flow ever runs, flow errors cover a single request from input validation
//! through the provider call.

use thiserror::Error;

/// Top-level error type for Frontstage operations.
#[derive(Error, Debug)]
pub enum FrontstageError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while running a flow
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the flow file from disk
    #[error("Failed to read flow file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse flow file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors for a single flow run.
///
/// Extraction failure is not an error: a reply that cannot be parsed
/// into sections is reported as `sections: None` on the outcome.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The request lacks an input the flow's modality requires
    #[error("{modality} input is required for this flow")]
    MissingInput { modality: String },

    /// The supplied input was present but unusable (wrong format, too large)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The configured provider identifier has no registered adapter
    #[error("Unknown AI provider \"{identifier}\". Supported: {}", known.join(", "))]
    UnknownProvider {
        identifier: String,
        known: Vec<String>,
    },

    /// The vendor call failed or returned unusable data
    #[error("{provider} error: {message}")]
    Provider {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },
}

impl FlowError {
    pub(crate) fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Whether resubmitting the same request might succeed.
    ///
    /// Transient: rate limits (429), server errors (5xx), timeouts and
    /// connection failures. Input and configuration errors never are.
    pub fn is_transient(&self) -> bool {
        match self {
            FlowError::Provider {
                status_code,
                message,
                ..
            } => {
                if let Some(code) = status_code {
                    return *code == 429 || (500..=599).contains(code);
                }
                // No status: the request never got a response
                message.contains("timed out") || message.contains("connect")
            }
            _ => false,
        }
    }
}

/// Convenience type alias for Frontstage results.
pub type Result<T> = std::result::Result<T, FrontstageError>;

/// Convenience type alias for flow-specific results.
pub type FlowResult<T> = std::result::Result<T, FlowError>;
