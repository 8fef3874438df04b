use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use imagerie_config::{LlmConfig, LlmProvider};
use imagerie_core::traits::LlmClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const DEFAULT_OLLAMA_BASE: &str = "http://localhost:11434";
const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{var} must be set to use the {provider} provider")]
    MissingApiKey {
        var: &'static str,
        provider: &'static str,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build the completion client for `config.provider`.
///
/// The Ollama base URL comes from `llm.api_base`, then `OLLAMA_BASE_URL`.
pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::Ollama => {
            let base_url = config
                .api_base
                .clone()
                .or_else(|| env::var("OLLAMA_BASE_URL").ok())
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE.to_string());
            Arc::new(OllamaClient::new(config, base_url)?)
        }
        LlmProvider::OpenAi => {
            let api_key = env::var("OPENAI_API_KEY").map_err(|_| LlmError::MissingApiKey {
                var: "OPENAI_API_KEY",
                provider: "openai",
            })?;
            let base_url = config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string());
            Arc::new(OpenAiClient::new(config, api_key, base_url)?)
        }
    };
    Ok(client)
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Ollama `/api/generate`, non-streaming.
pub struct OllamaClient {
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig, base_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            model: config.model.clone(),
            base_url,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: http_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "num_predict": self.max_tokens,
            }
        });

        let res = self.client.post(&url).json(&body).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama API error: {} - {}", status, text));
        }

        let json: serde_json::Value = res.json().await?;
        if let Some(error) = json.get("error") {
            return Err(anyhow!("Ollama returned error: {}", error));
        }
        let text = json["response"]
            .as_str()
            .ok_or_else(|| anyhow!("Invalid Ollama response: missing 'response'"))?;
        debug!("ollama completion: {} chars", text.len());
        Ok(text.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    model: String,
    api_key: String,
    api_base: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig, api_key: String, api_base: String) -> Result<Self, LlmError> {
        Ok(Self {
            model: config.model.clone(),
            api_key,
            api_base,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: http_client(config.timeout_secs)?,
        })
    }

    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let res = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI API error: {} - {}", status, text));
        }

        let json: serde_json::Value = res.json().await?;
        if let Some(error) = json.get("error") {
            return Err(anyhow!("OpenAI API returned error: {}", error));
        }

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Invalid response format: missing content in choices"))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&[Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        }])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_client_builds_offline() {
        let config = LlmConfig {
            api_base: Some("http://gpu-box:11434".to_string()),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_missing_openai_key_is_typed() {
        if env::var("OPENAI_API_KEY").is_ok() {
            return;
        }
        let config = LlmConfig {
            provider: LlmProvider::OpenAi,
            ..Default::default()
        };
        let err = build_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
