use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use imagerie_core::clarify::{critical_question, follow_up_question, needs_follow_up};
use imagerie_core::classify::{adapt_guideline, RecommendationClass};
use imagerie_core::enhance::enhance_query;
use imagerie_core::scoring::rank;
use imagerie_core::traits::VectorSearch;
use tracing::debug;

use super::{Engine, EvalContext, Outcome, Recommendation};

pub const NO_GUIDELINE_MESSAGE: &str =
    "ÉVALUATION CLINIQUE : Aucune guideline trouvée - Consultation spécialisée recommandée";

/// Rule-based questions, then nearest guidelines re-ranked by the
/// contextual score.
pub struct RetrievalEngine {
    search: Arc<dyn VectorSearch>,
    top_k: usize,
}

impl RetrievalEngine {
    pub fn new(search: Arc<dyn VectorSearch>, top_k: usize) -> Self {
        Self { search, top_k }
    }

    fn question(case: &str, ctx: EvalContext) -> Option<&'static str> {
        if ctx.forced {
            return None;
        }
        critical_question(case).or_else(|| {
            needs_follow_up(case, ctx.first_interaction).then(|| follow_up_question(case))
        })
    }
}

#[async_trait]
impl Engine for RetrievalEngine {
    fn name(&self) -> &'static str {
        "retrieval"
    }

    async fn evaluate(&self, case: &str, ctx: EvalContext) -> Result<Outcome> {
        if let Some(question) = Self::question(case, ctx) {
            return Ok(Outcome::Clarify(vec![question.to_string()]));
        }

        let query = enhance_query(case);
        debug!("enhanced query: {}", query);
        let hits = self.search.query(&query, self.top_k).await?;

        let Some(best) = rank(case, hits).into_iter().next() else {
            return Ok(Outcome::Recommend(Recommendation::new(NO_GUIDELINE_MESSAGE)));
        };
        debug!(
            "best guideline {} (distance {:.3}, score {:.3})",
            best.hit.id, best.hit.distance, best.score
        );

        let class = RecommendationClass::from_score(best.score, &best.hit.text);
        let adapted = adapt_guideline(&best.hit.text, case);
        Ok(Outcome::Recommend(Recommendation {
            text: format!("RECOMMANDATION D'IMAGERIE : {} : {}", class, adapted),
            notes: Vec::new(),
            class: Some(class),
            guideline_id: Some(best.hit.id),
        }))
    }
}
