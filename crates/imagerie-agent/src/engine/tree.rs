use anyhow::Result;
use async_trait::async_trait;
use imagerie_core::decision::{contraindication_notes, decide, Decision};
use imagerie_core::findings::ClinicalFindings;

use super::{Engine, EvalContext, Outcome, Recommendation};

/// Yes/no questions until the required findings are known, then the
/// deterministic headache decision.
pub struct DecisionTreeEngine;

impl DecisionTreeEngine {
    /// Decision for whatever is known; unknown signs count as absent.
    pub fn recommend(case: &str) -> Recommendation {
        let findings = ClinicalFindings::extract(case);
        let decision = decide(&findings);
        Recommendation {
            text: summary(&decision),
            notes: contraindication_notes(&findings),
            class: None,
            guideline_id: None,
        }
    }
}

fn summary(decision: &Decision) -> String {
    format!(
        "{} ({}) : {}",
        decision.exam,
        decision.urgency.label(),
        decision.text
    )
}

#[async_trait]
impl Engine for DecisionTreeEngine {
    fn name(&self) -> &'static str {
        "decision_tree"
    }

    async fn evaluate(&self, case: &str, ctx: EvalContext) -> Result<Outcome> {
        if !ctx.forced {
            let missing = ClinicalFindings::extract(case).missing();
            if !missing.is_empty() {
                return Ok(Outcome::Clarify(
                    missing.iter().map(|m| m.question().to_string()).collect(),
                ));
            }
        }
        Ok(Outcome::Recommend(Self::recommend(case)))
    }
}
