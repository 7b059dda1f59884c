//! Secret-free view of a flow for the capture UI.

use serde::Serialize;

use super::{
    AppConfig, BrandConfig, CameraFacing, CombinedInputPolicy, FlowConfig, InputConfig,
    InputType, OutputStyle, OutputType, SectionConfig,
};

/// The parts of a flow a browser needs to render capture and results.
///
/// Never carries provider, model, prompt or credentials. Keys are camelCase
/// throughout, unlike the snake_case flow file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub app: ClientApp,
    pub input: ClientInput,
    pub output: ClientOutput,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientApp {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<ClientBrand>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBrand {
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

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub camera_facing: CameraFacing,
    pub max_file_size: u64,
    pub accepted_formats: Vec<String>,
    pub combined_policy: CombinedInputPolicy,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOutput {
    pub style: OutputStyle,
    pub share_enabled: bool,
    /// Present only for `sections` flows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionConfig>>,
}

impl From<&BrandConfig> for ClientBrand {
    fn from(brand: &BrandConfig) -> Self {
        Self {
            logo: brand.logo.clone(),
            primary_color: brand.primary_color.clone(),
            secondary_color: brand.secondary_color.clone(),
            background_color: brand.background_color.clone(),
            text_color: brand.text_color.clone(),
            font_family: brand.font_family.clone(),
        }
    }
}

impl From<&AppConfig> for ClientApp {
    fn from(app: &AppConfig) -> Self {
        Self {
            name: app.name.clone(),
            description: app.description.clone(),
            template: app.template.clone(),
            brand: app.brand.as_ref().map(ClientBrand::from),
        }
    }
}

impl From<&InputConfig> for ClientInput {
    fn from(input: &InputConfig) -> Self {
        Self {
            input_type: input.input_type,
            label: input.label.clone(),
            instructions: input.instructions.clone(),
            placeholder: input.placeholder.clone(),
            camera_facing: input.camera_facing,
            max_file_size: input.max_file_size,
            accepted_formats: input.accepted_formats.clone(),
            combined_policy: input.combined_policy,
        }
    }
}

impl From<&FlowConfig> for ClientConfig {
    fn from(config: &FlowConfig) -> Self {
        let sections = match config.ai.output.output_type {
            OutputType::Sections => Some(config.ai.output.sections.clone()),
            OutputType::Markdown | OutputType::Raw => None,
        };
        Self {
            app: ClientApp::from(&config.app),
            input: ClientInput::from(&config.input),
            output: ClientOutput {
                style: config.output.style,
                share_enabled: config.output.share_enabled,
                sections,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_omits_ai_settings() {
        let mut config = FlowConfig::default();
        config.ai.system_prompt = Some("secret instructions".to_string());
        config.providers.openai.api_key = Some("sk-test".to_string());

        let json = serde_json::to_string(&config.client_config()).unwrap();
        assert!(!json.contains("secret instructions"));
        assert!(!json.contains("sk-test"));
        assert!(!json.contains("\"ai\""));
        assert!(json.contains("\"shareEnabled\":false"));
        assert!(!json.contains("\"sections\""));
    }

    #[test]
    fn test_client_config_includes_sections_for_sections_flow() {
        let mut config = FlowConfig::default();
        config.ai.output.output_type = OutputType::Sections;
        config.ai.output.sections = vec![SectionConfig {
            key: "summary".to_string(),
            title: "Summary".to_string(),
            icon: Some("sparkles".to_string()),
        }];

        let client = config.client_config();
        let sections = client.output.sections.unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].icon.as_deref(), Some("sparkles"));
    }

    #[test]
    fn test_nested_keys_are_camel_case() {
        let mut config = FlowConfig::default();
        config.app.brand = Some(BrandConfig {
            font_family: Some("Inter".to_string()),
            ..BrandConfig::default()
        });

        let value = serde_json::to_value(config.client_config()).unwrap();
        let input = &value["input"];
        assert_eq!(input["type"], "camera");
        assert_eq!(input["cameraFacing"], "environment");
        assert_eq!(input["maxFileSize"], 10);
        assert_eq!(input["acceptedFormats"][0], "image/jpeg");
        assert_eq!(input["combinedPolicy"], "primary");
        assert!(input.get("max_file_size").is_none());

        let brand = &value["app"]["brand"];
        assert_eq!(brand["primaryColor"], "#6366F1");
        assert_eq!(brand["secondaryColor"], "#1E1B4B");
        assert_eq!(brand["fontFamily"], "Inter");
        assert!(brand.get("primary_color").is_none());

        assert_eq!(value["output"]["shareEnabled"], false);
    }
}
