//! Case evaluators behind the dialogue.
//!
//! An [`Engine`] looks at the accumulated case and either asks for more
//! information or commits to a recommendation. Three strategies exist and
//! are selected by `dialogue.mode`.

mod llm;
mod retrieval;
mod tree;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use imagerie_config::{Config, DialogueMode};
use imagerie_core::classify::RecommendationClass;
use imagerie_core::traits::VectorSearch;
use serde::Serialize;
use tracing::info;

use crate::llm::build_client;

pub use llm::LlmEngine;
pub use retrieval::{RetrievalEngine, NO_GUIDELINE_MESSAGE};
pub use tree::DecisionTreeEngine;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub text: String,
    /// Precautions printed under the recommendation.
    pub notes: Vec<String>,
    pub class: Option<RecommendationClass>,
    pub guideline_id: Option<String>,
}

impl Recommendation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            notes: Vec::new(),
            class: None,
            guideline_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Clarify(Vec<String>),
    Recommend(Recommendation),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalContext {
    /// Clarification rounds already answered for this case.
    pub round: usize,
    /// False once the case has received any answer or amendment.
    pub first_interaction: bool,
    /// The engine must recommend with what it has.
    pub forced: bool,
}

impl EvalContext {
    pub fn initial() -> Self {
        Self {
            round: 0,
            first_interaction: true,
            forced: false,
        }
    }

    pub fn forced(self) -> Self {
        Self {
            forced: true,
            ..self
        }
    }
}

#[async_trait]
pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(&self, case: &str, ctx: EvalContext) -> Result<Outcome>;
}

/// Build the engine selected by `config.dialogue.mode`. The LLM client is
/// only constructed in LLM mode.
pub fn build_engine(config: &Config, search: Arc<dyn VectorSearch>) -> Result<Arc<dyn Engine>> {
    let engine: Arc<dyn Engine> = match config.dialogue.mode {
        DialogueMode::Retrieval => Arc::new(RetrievalEngine::new(search, config.retrieval.top_k)),
        DialogueMode::Llm => {
            let client = build_client(&config.llm)?;
            Arc::new(LlmEngine::new(
                client,
                search,
                config.retrieval.context_k,
                config.llm.max_retries,
            ))
        }
        DialogueMode::DecisionTree => Arc::new(DecisionTreeEngine),
    };
    info!("dialogue engine: {}", engine.name());
    Ok(engine)
}
