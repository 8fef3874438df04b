//! YAML format parser

use crate::{error::ConfigError, Config, Result};

pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    serde_yaml::from_str(content).map_err(|e| ConfigError::from_yaml_error(e, content, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DialogueMode;

    #[test]
    fn test_parse_dialogue_section() {
        let yaml = r#"
dialogue:
  mode: decision_tree
  max_clarification_rounds: 3
"#;
        let config = parse(yaml).unwrap();
        assert_eq!(config.dialogue.mode, DialogueMode::DecisionTree);
        assert_eq!(config.dialogue.max_clarification_rounds, 3);
    }

    #[test]
    fn test_parse_empty_yaml_uses_defaults() {
        let config = parse("{}").unwrap();
        assert_eq!(config, crate::Config::default());
    }
}
