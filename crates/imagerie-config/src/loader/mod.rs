//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

use crate::{Config, Result, Validate};
use std::path::{Path, PathBuf};

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
    /// Explicit config object (tests, embedding callers). Merged as a sparse
    /// overlay: only fields that differ from the defaults are taken.
    Explicit(Config),
}

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides
///
/// ```no_run
/// use imagerie_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".imagerie.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), imagerie_config::ConfigError>(())
/// ```
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Merge all sources in order, later sources winning, then validate the result.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    config = merge::merge(config, file::load_from_file(&path)?);
                }
                ConfigSource::Environment => {
                    env::apply_env(&mut config);
                }
                ConfigSource::Explicit(explicit) => config = merge::merge(config, explicit),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

const DEFAULT_PATHS: [&str; 4] = [
    ".imagerie.toml",
    ".imagerie.yml",
    ".imagerie.yaml",
    ".imagerie.json",
];

impl Config {
    /// Load configuration from the first default file found in the working
    /// directory (`.imagerie.toml`, `.imagerie.yml`, `.imagerie.yaml`,
    /// `.imagerie.json`), then apply environment overlays.
    ///
    /// Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = DEFAULT_PATHS.iter().find(|p| Path::new(p).exists()) {
            builder = builder.with_file(path);
        }

        builder.with_env().build()
    }

    /// Load configuration from a specific file, then apply environment overlays.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DialogueMode;
    use std::io::Write;

    #[test]
    fn test_builder_default() {
        let config = ConfigBuilder::new().build().unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_then_explicit_override() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[retrieval]\ntop_k = 8\n\n[dialogue]\nmode = \"llm\"").unwrap();

        let mut explicit = Config::default();
        explicit.dialogue.mode = DialogueMode::DecisionTree;

        let config = ConfigBuilder::new()
            .with_file(file.path())
            .with_config(explicit)
            .build()
            .unwrap();

        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.dialogue.mode, DialogueMode::DecisionTree);
    }

    #[test]
    fn test_env_default_value_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[retrieval]\ntop_k = 10\n\n[dialogue]\nmode = \"llm\"").unwrap();

        let mut config = merge::merge(Config::default(), file::load_from_file(file.path()).unwrap());
        assert_eq!(config.dialogue.mode, DialogueMode::Llm);

        env::apply_vars(
            &mut config,
            vec![
                ("IMAGERIE_DIALOGUE_MODE".to_string(), "retrieval".to_string()),
                ("IMAGERIE_RETRIEVAL_TOP_K".to_string(), "5".to_string()),
            ],
        );

        assert_eq!(config.dialogue.mode, DialogueMode::Retrieval);
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ConfigBuilder::new()
            .with_file("/definitely/not/here.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_merged_result_is_validated() {
        let mut explicit = Config::default();
        explicit.retrieval.top_k = 2;
        let result = ConfigBuilder::new().with_config(explicit).build();
        // context_k keeps its default of 3, which now exceeds top_k
        assert!(result.is_err());
    }
}
