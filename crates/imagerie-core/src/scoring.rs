//! Contextual re-scoring of retrieved guidelines.
//!
//! The vector distance gives a base score of `max(0, 1 - distance)`, then
//! clinical context multiplies it. The final value is clamped to `[0, 1]`.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::SearchHit;
use crate::text::{contains_any, normalize};

const URGENCY_BOOST: f32 = 2.0;
const PEDIATRIC_BOOST: f32 = 1.5;
const CONTRAINDICATION_BOOST: f32 = 1.8;
const UNSAFE_SCANNER_PENALTY: f32 = 0.3;
const ANATOMY_BOOST: f32 = 1.4;
const TEMPORAL_BOOST: f32 = 1.3;

const PEDIATRIC_AGE: u32 = 18;

const URGENCY_TERMS: &[&str] = &[
    "brutal",
    "aigu",
    "soudain",
    "coup de tonnerre",
    "hemorragie",
    "avc",
    "coma",
];

const CONTRAINDICATION_TERMS: &[&str] = &["contre-indication", "eviter", "alternative"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exclusion {
    Pregnancy,
    Claustrophobia,
    RenalFailure,
}

const EXCLUSIONS: &[(Exclusion, &[&str])] = &[
    (Exclusion::Pregnancy, &["femme enceinte", "grossesse", "enceinte"]),
    (Exclusion::Claustrophobia, &["claustrophobie", "angoisse", "peur"]),
    (
        Exclusion::RenalFailure,
        &["insuffisance renale", "creatinine", "dialyse"],
    ),
];

const ANATOMY: &[(&str, &[&str])] = &[
    ("cephalee", &["cerebral", "crane", "tete", "neurologique"]),
    ("abdomen", &["abdominal", "ventre", "digestif", "fid"]),
    ("lombaire", &["dos", "rachis", "colonne", "vertebral"]),
    ("thorax", &["poumon", "cardiaque", "thoracique", "respiratoire"]),
];

const TEMPORAL_CASE_TERMS: &[&str] = &["chronique", "persistant", "recurrent", "6 semaines"];
const TEMPORAL_GUIDELINE_TERMS: &[&str] = &["chronique", "persistant", "6 semaines"];

/// Base score plus every multiplier that fired, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base: f32,
    pub factors: Vec<(&'static str, f32)>,
}

impl ScoreBreakdown {
    pub fn multiplier(&self) -> f32 {
        self.factors.iter().map(|(_, f)| f).product()
    }

    pub fn total(&self) -> f32 {
        (self.base * self.multiplier()).clamp(0.0, 1.0)
    }
}

pub fn explain_score(vignette: &str, guideline: &str, distance: f32) -> ScoreBreakdown {
    let case = normalize(vignette);
    let guideline = normalize(guideline);
    let mut factors = Vec::new();

    if contains_any(&case, URGENCY_TERMS)
        && (guideline.contains("urgent") || guideline.contains("scanner"))
    {
        factors.push(("urgence", URGENCY_BOOST));
    }

    if is_pediatric(&case) && guideline.contains("enfant") {
        factors.push(("pédiatrie", PEDIATRIC_BOOST));
    }

    for (kind, terms) in EXCLUSIONS {
        if !contains_any(&case, terms) {
            continue;
        }
        if contains_any(&guideline, CONTRAINDICATION_TERMS) {
            factors.push(("contre-indication gérée", CONTRAINDICATION_BOOST));
        } else if guideline.contains("scanner")
            && matches!(kind, Exclusion::Pregnancy | Exclusion::RenalFailure)
        {
            factors.push(("scanner inadapté", UNSAFE_SCANNER_PENALTY));
        }
    }

    for (symptom, anatomy) in ANATOMY {
        if case.contains(symptom) && contains_any(&guideline, anatomy) {
            factors.push(("anatomie", ANATOMY_BOOST));
        }
    }

    if contains_any(&case, TEMPORAL_CASE_TERMS)
        && contains_any(&guideline, TEMPORAL_GUIDELINE_TERMS)
    {
        factors.push(("temporalité", TEMPORAL_BOOST));
    }

    ScoreBreakdown {
        base: (1.0 - distance).max(0.0),
        factors,
    }
}

/// Contextual relevance of `guideline` for `vignette`, in `[0, 1]`.
pub fn contextual_score(vignette: &str, guideline: &str, distance: f32) -> f32 {
    explain_score(vignette, guideline, distance).total()
}

// A child is mentioned and some standalone number is a plausible paediatric age.
fn is_pediatric(case: &str) -> bool {
    contains_any(case, &["enfant", "ans", "annees"])
        && case
            .split_whitespace()
            .filter_map(|w| w.parse::<u32>().ok())
            .any(|n| n <= PEDIATRIC_AGE)
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredHit {
    pub hit: SearchHit,
    pub score: f32,
}

/// Score each hit and order by score descending, then distance ascending,
/// then guideline id ascending.
pub fn rank(vignette: &str, hits: Vec<SearchHit>) -> Vec<ScoredHit> {
    let mut scored: Vec<ScoredHit> = hits
        .into_iter()
        .map(|hit| ScoredHit {
            score: contextual_score(vignette, &hit.text, hit.distance),
            hit,
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.hit
                    .distance
                    .partial_cmp(&b.hit.distance)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.hit.id.cmp(&b.hit.id))
    });
    scored
}
