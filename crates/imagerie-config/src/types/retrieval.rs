//! Retrieval configuration: result counts and embedding backend

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of guidelines fetched from the vector index and re-scored
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Number of guidelines quoted in the LLM prompt
    #[serde(default = "default_context_k")]
    pub context_k: usize,

    #[serde(default)]
    pub embedding: EmbeddingBackend,

    /// Model name for ollama/openai backends
    ///
    /// Defaults to "nomic-embed-text" (ollama) or "text-embedding-3-small" (openai).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,

    /// Vector width of the local hashing embedder
    #[serde(default = "default_hash_dimension")]
    pub hash_dimension: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Deterministic local hashing of accent-folded words; works offline
    #[default]
    Hash,
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

impl EmbeddingBackend {
    pub const OPTIONS: [&'static str; 3] = ["hash", "ollama", "openai"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "hash" | "local" => Some(Self::Hash),
            "ollama" => Some(Self::Ollama),
            "openai" | "external" => Some(Self::OpenAi),
            _ => None,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            context_k: default_context_k(),
            embedding: EmbeddingBackend::default(),
            embedding_model: None,
            hash_dimension: default_hash_dimension(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("retrieval.top_k", self.top_k, 0)?;
        validate_positive("retrieval.context_k", self.context_k, 0)?;
        if self.top_k > 100 {
            return Err(ConfigError::validation(
                "retrieval.top_k",
                format!("top_k too large ({}), use <= 100", self.top_k),
            ));
        }
        if !(16..=4096).contains(&self.hash_dimension) {
            return Err(ConfigError::validation(
                "retrieval.hash_dimension",
                format!("must be within 16..=4096, got {}", self.hash_dimension),
            ));
        }
        if matches!(&self.embedding_model, Some(m) if m.trim().is_empty()) {
            return Err(ConfigError::validation(
                "retrieval.embedding_model",
                "Model name cannot be empty (use null to unset)",
            ));
        }
        Ok(())
    }
}

fn default_top_k() -> usize {
    5
}

fn default_context_k() -> usize {
    3
}

fn default_hash_dimension() -> usize {
    384
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = RetrievalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k, 5);
        assert_eq!(config.context_k, 3);
        assert_eq!(config.embedding, EmbeddingBackend::Hash);
    }

    #[test]
    fn test_zero_top_k_invalid() {
        let config = RetrievalConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tiny_hash_dimension_invalid() {
        let config = RetrievalConfig {
            hash_dimension: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_serialization() {
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::OpenAi).unwrap(),
            "\"openai\""
        );
        assert_eq!(EmbeddingBackend::parse("External"), Some(EmbeddingBackend::OpenAi));
        assert_eq!(EmbeddingBackend::parse("nope"), None);
    }
}
