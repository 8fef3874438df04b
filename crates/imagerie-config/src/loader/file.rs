//! File-based configuration loading

use crate::{error::ConfigError, loader::ConfigFormat, Config, Result};
use std::fs;
use std::path::Path;

/// Load a configuration file; the format is chosen from the extension.
///
/// The file is only parsed here. Validation happens once all layers are merged,
/// so a partial file that relies on other layers is accepted.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let format = detect_format(path)?;

    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let path_str = path.to_str();
    match format {
        ConfigFormat::Yaml => super::formats::yaml::parse_with_path(&content, path_str),
        ConfigFormat::Toml => super::formats::toml::parse_with_path(&content, path_str),
        ConfigFormat::Json => super::formats::json::parse_with_path(&content, path_str),
    }
}

fn detect_format(path: &Path) -> Result<ConfigFormat> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yml") | Some("yaml") => Ok(ConfigFormat::Yaml),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some("json") => Ok(ConfigFormat::Json),
        _ => Err(ConfigError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_formats() {
        assert_eq!(
            detect_format(&PathBuf::from("c.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            detect_format(&PathBuf::from("c.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            detect_format(&PathBuf::from("c.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            detect_format(&PathBuf::from("c.json")).unwrap(),
            ConfigFormat::Json
        );
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            detect_format(&PathBuf::from("config.txt")),
            Err(ConfigError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_from_file("/nope/.imagerie.json"),
            Err(ConfigError::FileNotFound { .. })
        ));
    }
}
