//! Sub-configuration structs for a flow file.

use serde::{Deserialize, Serialize};

/// Application identity shown by the capture UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display name of the flow
    pub name: String,

    /// One-line description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// UI template identifier
    #[serde(default = "default_template")]
    pub template: String,

    /// Optional branding overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<BrandConfig>,
}

fn default_template() -> String {
    "default".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Frontstage".to_string(),
            description: None,
            template: default_template(),
            brand: None,
        }
    }
}

/// Branding colors and assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            logo: None,
            primary_color: "#6366F1".to_string(),
            secondary_color: "#1E1B4B".to_string(),
            background_color: None,
            text_color: None,
            font_family: None,
        }
    }
}

/// Input modality a flow collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    #[serde(rename = "camera")]
    Camera,
    #[serde(rename = "upload")]
    Upload,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "camera+text")]
    CameraText,
    #[serde(rename = "upload+text")]
    UploadText,
}

impl InputType {
    /// Whether the modality carries an image leg.
    pub fn takes_image(self) -> bool {
        !matches!(self, InputType::Text)
    }

    /// Whether the modality carries a text leg.
    pub fn takes_text(self) -> bool {
        matches!(
            self,
            InputType::Text | InputType::CameraText | InputType::UploadText
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Camera => "camera",
            InputType::Upload => "upload",
            InputType::Text => "text",
            InputType::CameraText => "camera+text",
            InputType::UploadText => "upload+text",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How `camera+text` / `upload+text` flows decide that input is complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinedInputPolicy {
    /// The image leg is mandatory, text is optional
    #[default]
    Primary,
    /// Either leg satisfies the flow
    Either,
    /// Both legs are mandatory
    Both,
}

/// Which way the capture UI points the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    User,
    #[default]
    Environment,
}

/// Input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Input modality
    #[serde(rename = "type")]
    pub input_type: InputType,

    /// Label shown above the capture widget
    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default)]
    pub camera_facing: CameraFacing,

    /// Maximum image size in megabytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Accepted image MIME types
    #[serde(default = "default_accepted_formats")]
    pub accepted_formats: Vec<String>,

    /// Completeness rule for combined modalities
    #[serde(default)]
    pub combined_policy: CombinedInputPolicy,
}

fn default_max_file_size() -> u64 {
    10
}

fn default_accepted_formats() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/webp".to_string(),
    ]
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            input_type: InputType::Camera,
            label: "Take a photo".to_string(),
            instructions: None,
            placeholder: None,
            camera_facing: CameraFacing::default(),
            max_file_size: default_max_file_size(),
            accepted_formats: default_accepted_formats(),
            combined_policy: CombinedInputPolicy::default(),
        }
    }
}

/// Output shape discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    Sections,
    Markdown,
    Raw,
}

impl OutputType {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Sections => "sections",
            OutputType::Markdown => "markdown",
            OutputType::Raw => "raw",
        }
    }
}

/// One named section of a `sections` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Key the model must produce
    pub key: String,

    /// Display title
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Output shape: what kind of result the flow expects from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiOutputConfig {
    #[serde(rename = "type")]
    pub output_type: OutputType,

    /// Ordered sections, only meaningful for `sections`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionConfig>,
}

impl AiOutputConfig {
    /// Section keys the model must produce, in display order.
    ///
    /// Empty unless the output type is `sections`.
    pub fn section_keys(&self) -> Vec<String> {
        match self.output_type {
            OutputType::Sections => self.sections.iter().map(|s| s.key.clone()).collect(),
            OutputType::Markdown | OutputType::Raw => Vec::new(),
        }
    }
}

impl Default for AiOutputConfig {
    fn default() -> Self {
        Self {
            output_type: OutputType::Markdown,
            sections: Vec::new(),
        }
    }
}

/// AI settings for the flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Provider identifier ("openai", "anthropic", "google")
    pub provider: String,

    /// Provider-specific model identifier
    pub model: String,

    /// Prompt template; `{{input}}` is replaced with user text
    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Sampling temperature, 0.0 to 2.0
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    pub output: AiOutputConfig,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            prompt: "Describe what you see in this image.".to_string(),
            system_prompt: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            output: AiOutputConfig::default(),
        }
    }
}

/// Result presentation style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Card,
    Fullwidth,
    Minimal,
}

/// Presentation settings, passed through to the UI untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub style: OutputStyle,
    pub share_enabled: bool,
}

/// Credentials and endpoint override for one provider.
///
/// Unset fields fall back to the provider's defaults: the key is read from
/// the vendor's conventional environment variable and the public API URL is
/// used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoint {
    /// API key (supports ${ENV_VAR} syntax)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL, without the operation path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Provider credentials and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Per-request timeout applied by the HTTP client
    pub request_timeout_ms: u64,

    pub openai: ProviderEndpoint,
    pub anthropic: ProviderEndpoint,
    pub google: ProviderEndpoint,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 60_000,
            openai: ProviderEndpoint::default(),
            anthropic: ProviderEndpoint::default(),
            google: ProviderEndpoint::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
