//! Configuration type definitions, one module per concern

pub mod core;
pub mod dialogue;
pub mod llm;
pub mod retrieval;

pub use self::core::CoreConfig;
pub use dialogue::{DialogueConfig, DialogueMode};
pub use llm::{LlmConfig, LlmProvider};
pub use retrieval::{EmbeddingBackend, RetrievalConfig};

use serde::{Deserialize, Serialize};

/// Top-level configuration, organized by functional area
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Guideline file and output locations
    #[serde(default)]
    pub core: CoreConfig,

    /// Vector search and embedding settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// LLM collaborator settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Clarification dialogue behavior
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.retrieval.validate()?;
        self.llm.validate()?;
        self.dialogue.validate()?;

        if self.retrieval.context_k > self.retrieval.top_k {
            return Err(crate::error::ConfigError::validation(
                "retrieval.context_k",
                format!(
                    "context_k ({}) cannot exceed top_k ({})",
                    self.retrieval.context_k, self.retrieval.top_k
                ),
            ));
        }
        Ok(())
    }
}
