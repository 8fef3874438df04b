//! JSON format parser

use crate::{error::ConfigError, Config, Result};

pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    serde_json::from_str(content).map_err(|e| ConfigError::from_json_error(e, content, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LlmProvider;

    #[test]
    fn test_parse_llm_section() {
        let json = r#"{
            "llm": { "provider": "openai", "model": "gpt-4o-mini", "temperature": 0.2 }
        }"#;
        let config = parse(json).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_parse_error_has_context() {
        let json = "{\n  \"retrieval\": { \"top_k\": \"many\" }\n}";
        let err = parse(json).unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }
}
