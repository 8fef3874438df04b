use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use imagerie_core::traits::{LlmClient, VectorSearch};
use tracing::{debug, warn};

use super::tree::DecisionTreeEngine;
use super::{Engine, EvalContext, Outcome, Recommendation};
use crate::prompts::build_prompt;
use crate::reply::{ask_llm, LlmReply};

/// Retrieved guidelines handed to the language model as context.
pub struct LlmEngine {
    client: Arc<dyn LlmClient>,
    search: Arc<dyn VectorSearch>,
    context_k: usize,
    max_retries: usize,
}

impl LlmEngine {
    pub fn new(
        client: Arc<dyn LlmClient>,
        search: Arc<dyn VectorSearch>,
        context_k: usize,
        max_retries: usize,
    ) -> Self {
        Self {
            client,
            search,
            context_k,
            max_retries,
        }
    }
}

#[async_trait]
impl Engine for LlmEngine {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn evaluate(&self, case: &str, ctx: EvalContext) -> Result<Outcome> {
        let hits = self.search.query(case, self.context_k).await?;
        debug!("{} guidelines in context", hits.len());

        let prompt = build_prompt(case, &hits, ctx.forced);
        match ask_llm(self.client.as_ref(), &prompt, self.max_retries).await? {
            LlmReply::Recommendation { text } => Ok(Outcome::Recommend(Recommendation {
                guideline_id: hits.first().map(|h| h.id.clone()),
                ..Recommendation::new(text)
            })),
            LlmReply::Clarify { .. } if ctx.forced => {
                warn!("model kept asking after the round limit, using the decision tree");
                Ok(Outcome::Recommend(DecisionTreeEngine::recommend(case)))
            }
            LlmReply::Clarify { questions } => Ok(Outcome::Clarify(questions)),
        }
    }
}
