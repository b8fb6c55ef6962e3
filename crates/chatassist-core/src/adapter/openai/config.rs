//! Configuration for the OpenAI chat completions adapter.

use serde::{Deserialize, Serialize};

/// Settings for [`super::OpenAiAdapter`].
///
/// All fields have defaults, so an empty TOML table or `{}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiAdapterConfig {
    /// Model identifier placed in built submissions.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on the number of messages in one submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_messages: Option<usize>,
}

fn default_model() -> String {
    "gpt-3.5-turbo-1106".to_string()
}

impl Default for OpenAiAdapterConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_messages: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = OpenAiAdapterConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo-1106");
        assert!(config.max_messages.is_none());
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: OpenAiAdapterConfig = toml::from_str("").unwrap();
        assert_eq!(config, OpenAiAdapterConfig::default());
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
model = "gpt-4-turbo-preview"
max_messages = 32
"#;
        let config: OpenAiAdapterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gpt-4-turbo-preview");
        assert_eq!(config.max_messages, Some(32));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = OpenAiAdapterConfig {
            model: "gpt-4".to_string(),
            max_messages: Some(8),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: OpenAiAdapterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let json = serde_json::to_string(&OpenAiAdapterConfig::default()).unwrap();
        assert!(!json.contains("max_messages"));
    }
}
