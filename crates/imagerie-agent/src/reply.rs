//! The reply contract between the dialogue and the language model.
//!
//! A reply is either a list of clarifying questions or a final
//! recommendation. Two encodings are accepted: the prefix convention
//! (`Pour préciser: q1 | q2`, `Recommandation: ...`) and a JSON envelope,
//! bare or wrapped in prose or a code fence.

use std::fmt;

use anyhow::Result;
use imagerie_core::traits::LlmClient;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::prompts::{with_reminder, CLARIFY_PREFIX, FALLBACK_QUESTIONS, RECOMMEND_PREFIX};

static CLARIFY_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[\s*_]*pour\s+pr[ée]ciser\s*:[\s*_]*").unwrap());
static RECOMMEND_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[\s*_]*recommandation\s*:[\s*_]*").unwrap());
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap());

const EXCERPT_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmReply {
    Clarify { questions: Vec<String> },
    Recommendation { text: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplyError {
    #[error("Empty reply")]
    Empty,

    #[error("Clarification without any question")]
    NoQuestions,

    #[error("Recommendation without text")]
    EmptyRecommendation,

    #[error("Reply follows neither the prefix nor the JSON format: {excerpt}")]
    UnknownFormat { excerpt: String },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Envelope {
    #[serde(alias = "clarification", alias = "questions")]
    Clarify { questions: Vec<String> },
    #[serde(alias = "recommandation")]
    Recommendation { text: String },
}

/// Trimmed question ending with a single " ?".
pub fn clean_question(raw: &str) -> Option<String> {
    let q = raw
        .trim()
        .trim_start_matches(['-', '*', '•'])
        .trim()
        .trim_end_matches('?')
        .trim();
    (!q.is_empty()).then(|| format!("{} ?", q))
}

fn split_questions(body: &str) -> Vec<String> {
    body.split(['|', '?', ';', '\n'])
        .filter_map(clean_question)
        .collect()
}

fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(EXCERPT_CHARS).collect();
    if text.chars().count() > EXCERPT_CHARS {
        out.push_str("...");
    }
    out
}

fn json_candidate(text: &str) -> Option<&str> {
    if let Some(caps) = CODE_FENCE.captures(text) {
        return caps.get(1).map(|m| m.as_str());
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

impl LlmReply {
    pub fn parse(raw: &str) -> Result<Self, ReplyError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ReplyError::Empty);
        }

        if let Some(m) = CLARIFY_HEAD.find(text) {
            return Self::clarify(split_questions(&text[m.end()..]));
        }
        if let Some(m) = RECOMMEND_HEAD.find(text) {
            return Self::recommend(&text[m.end()..]);
        }

        if let Some(candidate) = json_candidate(text) {
            match serde_json::from_str::<Envelope>(candidate) {
                Ok(Envelope::Clarify { questions }) => {
                    return Self::clarify(
                        questions.iter().filter_map(|q| clean_question(q)).collect(),
                    )
                }
                Ok(Envelope::Recommendation { text }) => return Self::recommend(&text),
                Err(e) => debug!("JSON envelope rejected: {}", e),
            }
        }

        Err(ReplyError::UnknownFormat {
            excerpt: excerpt(text),
        })
    }

    fn clarify(questions: Vec<String>) -> Result<Self, ReplyError> {
        if questions.is_empty() {
            return Err(ReplyError::NoQuestions);
        }
        Ok(Self::Clarify { questions })
    }

    fn recommend(text: &str) -> Result<Self, ReplyError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReplyError::EmptyRecommendation);
        }
        Ok(Self::Recommendation {
            text: text.to_string(),
        })
    }

    /// The canned three-question clarification.
    pub fn fallback() -> Self {
        Self::Clarify {
            questions: FALLBACK_QUESTIONS
                .iter()
                .filter_map(|q| clean_question(q))
                .collect(),
        }
    }
}

impl fmt::Display for LlmReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmReply::Clarify { questions } => {
                write!(f, "{} {}", CLARIFY_PREFIX, questions.join(" | "))
            }
            LlmReply::Recommendation { text } => write!(f, "{} {}", RECOMMEND_PREFIX, text),
        }
    }
}

/// Query the model, re-asking with a format reminder up to `max_retries`
/// times when the reply is unusable, then fall back to the canned questions.
/// Transport errors are returned as-is.
pub async fn ask_llm(client: &dyn LlmClient, prompt: &str, max_retries: usize) -> Result<LlmReply> {
    let mut current = prompt.to_string();
    for attempt in 0..=max_retries {
        let raw = client.complete(&current).await?;
        match LlmReply::parse(&raw) {
            Ok(reply) => return Ok(reply),
            Err(e) => {
                warn!("unusable model reply (attempt {}): {}", attempt + 1, e);
                current = with_reminder(prompt);
            }
        }
    }
    warn!("model never followed the reply format, using canned questions");
    Ok(LlmReply::fallback())
}
