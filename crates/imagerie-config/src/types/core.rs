//! Core configuration (guideline source, output directory)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    /// Guideline file loaded at startup (.json or one-per-line .txt)
    #[serde(default = "default_guidelines_path")]
    pub guidelines_path: PathBuf,

    /// Directory where prescriptions and reports are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            guidelines_path: default_guidelines_path(),
            output_dir: default_output_dir(),
        }
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.guidelines_path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "core.guidelines_path",
                "Guideline path cannot be empty",
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "core.output_dir",
                "Output directory cannot be empty",
            ));
        }
        Ok(())
    }
}

fn default_guidelines_path() -> PathBuf {
    PathBuf::from("data/guidelines.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("ordonnances")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_guidelines_path_invalid() {
        let config = CoreConfig {
            guidelines_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
