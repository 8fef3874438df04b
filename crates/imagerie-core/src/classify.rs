use std::fmt;

use serde::Serialize;

use crate::findings::ClinicalFindings;
use crate::text::{contains_any, normalize};

pub const URGENT_THRESHOLD: f32 = 0.8;
pub const INDICATED_THRESHOLD: f32 = 0.5;
pub const EVALUATION_THRESHOLD: f32 = 0.3;

const URGENT_TERMS: &[&str] = &["urgent", "immediat", "sans delai"];
const NO_IMAGING_TERMS: &[&str] = &["pas d'imagerie", "aucune indication", "contre-indication"];

const PEDIATRIC_NOTE: &str = " (Contexte pédiatrique : attention aux doses de rayonnement)";
const PREGNANCY_NOTE: &str = " (Grossesse : privilégier l'échographie, éviter les rayonnements)";
const URGENCY_NOTE: &str = " (Contexte d'urgence : prioriser l'imagerie rapide)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendationClass {
    Urgent,
    Indicated,
    Evaluation,
    NoImaging,
    Other,
}

impl RecommendationClass {
    pub fn from_score(score: f32, guideline: &str) -> Self {
        let guideline = normalize(guideline);
        if score >= URGENT_THRESHOLD {
            if contains_any(&guideline, URGENT_TERMS) {
                Self::Urgent
            } else {
                Self::Indicated
            }
        } else if score >= INDICATED_THRESHOLD {
            Self::Indicated
        } else if score >= EVALUATION_THRESHOLD {
            Self::Evaluation
        } else if contains_any(&guideline, NO_IMAGING_TERMS) {
            Self::NoImaging
        } else {
            Self::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Urgent => "URGENTE",
            Self::Indicated => "INDIQUÉE",
            Self::Evaluation => "ÉVALUATION",
            Self::NoImaging => "AUCUNE",
            Self::Other => "AUTRE",
        }
    }
}

impl fmt::Display for RecommendationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Append context notes (paediatric, pregnancy, urgency) that the guideline
/// does not already address.
pub fn adapt_guideline(guideline: &str, vignette: &str) -> String {
    let case = normalize(vignette);
    let findings = ClinicalFindings::extract(vignette);
    let folded_guideline = normalize(guideline);
    let mut adapted = guideline.to_string();

    let pediatric = case.contains("enfant") || findings.age.is_some_and(|a| a < 18);
    if pediatric && !folded_guideline.contains("pediatrique") {
        adapted.push_str(PEDIATRIC_NOTE);
    }

    let pregnant = case.contains("femme") && contains_any(&case, &["enceinte", "grossesse"]);
    if pregnant && !folded_guideline.contains("grossesse") {
        adapted.push_str(PREGNANCY_NOTE);
    }

    if contains_any(&case, &["urgent", "aigu"]) && !folded_guideline.contains("urgent") {
        adapted.push_str(URGENCY_NOTE);
    }

    adapted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let g = "Scanner cérébral sans délai";
        assert_eq!(RecommendationClass::from_score(0.9, g), RecommendationClass::Urgent);
        assert_eq!(
            RecommendationClass::from_score(0.8, "IRM cérébrale"),
            RecommendationClass::Indicated
        );
        assert_eq!(RecommendationClass::from_score(0.5, g), RecommendationClass::Indicated);
        assert_eq!(RecommendationClass::from_score(0.3, g), RecommendationClass::Evaluation);
        assert_eq!(
            RecommendationClass::from_score(0.1, "Pas d'imagerie avant 6 semaines"),
            RecommendationClass::NoImaging
        );
        assert_eq!(RecommendationClass::from_score(0.1, g), RecommendationClass::Other);
    }

    #[test]
    fn test_adapt_adds_missing_notes_once() {
        let adapted = adapt_guideline("IRM cérébrale", "enfant de 6 ans, céphalées aiguës");
        assert!(adapted.contains("pédiatrique"));
        assert!(adapted.contains("Contexte d'urgence"));
        assert!(!adapted.contains("Grossesse"));

        let adapted = adapt_guideline(
            "Échographie, pas de scanner pendant la grossesse",
            "femme enceinte de 12 SA",
        );
        assert_eq!(adapted, "Échographie, pas de scanner pendant la grossesse");
    }
}
