//! Clarification dialogue configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueConfig {
    /// Which engine turns a case into questions or a recommendation
    #[serde(default)]
    pub mode: DialogueMode,

    /// After this many clarification rounds the engine must recommend
    #[serde(default = "default_max_rounds")]
    pub max_clarification_rounds: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DialogueMode {
    /// Retrieved guidelines are handed to the LLM collaborator
    Llm,
    /// Retrieved guidelines are re-scored with the contextual heuristics
    #[default]
    Retrieval,
    /// Findings are extracted and run through the headache decision tree
    DecisionTree,
}

impl DialogueMode {
    pub const OPTIONS: [&'static str; 3] = ["llm", "retrieval", "decision_tree"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().replace('-', "_").as_str() {
            "llm" => Some(Self::Llm),
            "retrieval" | "rag" => Some(Self::Retrieval),
            "decision_tree" | "tree" => Some(Self::DecisionTree),
            _ => None,
        }
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            mode: DialogueMode::default(),
            max_clarification_rounds: default_max_rounds(),
        }
    }
}

impl crate::validation::Validate for DialogueConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_positive(
            "dialogue.max_clarification_rounds",
            self.max_clarification_rounds,
            0,
        )
    }
}

fn default_max_rounds() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = DialogueConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, DialogueMode::Retrieval);
    }

    #[test]
    fn test_zero_rounds_invalid() {
        let config = DialogueConfig {
            max_clarification_rounds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_parse_and_serialization() {
        assert_eq!(DialogueMode::parse("decision-tree"), Some(DialogueMode::DecisionTree));
        assert_eq!(DialogueMode::parse("RAG"), Some(DialogueMode::Retrieval));
        assert_eq!(
            serde_json::to_string(&DialogueMode::DecisionTree).unwrap(),
            "\"decision_tree\""
        );
    }
}
