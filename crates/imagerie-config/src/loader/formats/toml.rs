//! TOML format parser

use crate::{error::ConfigError, Config, Result};

pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    ::toml::from_str(content).map_err(|e| ConfigError::from_toml_error(e, content, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmbeddingBackend;

    #[test]
    fn test_parse_retrieval_section() {
        let toml = r#"
[retrieval]
top_k = 7
embedding = "ollama"
embedding_model = "nomic-embed-text"
"#;
        let config = parse(toml).unwrap();
        assert_eq!(config.retrieval.top_k, 7);
        assert_eq!(config.retrieval.embedding, EmbeddingBackend::Ollama);
        assert_eq!(
            config.retrieval.embedding_model.as_deref(),
            Some("nomic-embed-text")
        );
    }

    #[test]
    fn test_unknown_enum_rejected() {
        let toml = "[dialogue]\nmode = \"oracle\"\n";
        assert!(parse(toml).is_err());
    }
}
