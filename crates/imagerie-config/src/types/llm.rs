//! LLM configuration

use serde::{Deserialize, Serialize};

/// LLM (Large Language Model) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,

    /// Model name
    ///
    /// Examples: "biomistral-clinical:latest" (ollama), "gpt-4o-mini" (openai)
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional API base URL override
    ///
    /// Ollama defaults to `http://localhost:11434`, OpenAI to `https://api.openai.com/v1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Sampling temperature; 0 keeps the reply format stable
    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts, with a format reminder, when a reply breaks the contract
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

impl LlmProvider {
    pub const OPTIONS: [&'static str; 2] = ["ollama", "openai"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
            api_base: None,
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl crate::validation::Validate for LlmConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_range, validate_url};

        if self.model.is_empty() {
            return Err(ConfigError::validation(
                "llm.model",
                "Model name cannot be empty",
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::validation("llm.max_tokens", "max_tokens must be > 0"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "llm.timeout_secs",
                "timeout_secs must be > 0",
            ));
        }
        if self.max_retries > 5 {
            return Err(ConfigError::validation(
                "llm.max_retries",
                format!("at most 5 retries are allowed, got {}", self.max_retries),
            ));
        }
        validate_range("llm.temperature", self.temperature, 0.0, 2.0)?;
        validate_url("llm.api_base", self.api_base.as_deref())?;

        Ok(())
    }
}

fn default_model() -> String {
    "biomistral-clinical:latest".to_string()
}

fn default_max_tokens() -> u32 {
    400
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = LlmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, LlmProvider::Ollama);
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_empty_model_invalid() {
        let config = LlmConfig {
            model: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_temperature_out_of_range() {
        let config = LlmConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_api_base() {
        let config = LlmConfig {
            api_base: Some("not-a-url".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_many_retries() {
        let config = LlmConfig {
            max_retries: 9,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
