//! Guideline collection loaded from disk at startup.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::GuidelineRecord;

pub const SUPPORTED_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum GuidelineError {
    #[error("Failed to read guideline file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid guideline JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported guideline schema version {found} (supported: {})", SUPPORTED_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error("Guideline #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("Guideline '{id}' has an empty text")]
    EmptyText { id: String },

    #[error("Duplicate guideline id '{id}'")]
    DuplicateId { id: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GuidelineFile {
    Bare(Vec<GuidelineRecord>),
    Versioned {
        #[serde(default = "default_version")]
        version: u32,
        guidelines: Vec<GuidelineRecord>,
    },
}

fn default_version() -> u32 {
    SUPPORTED_VERSION
}

#[derive(Debug, Clone, Default)]
pub struct GuidelineStore {
    version: Option<u32>,
    records: Vec<GuidelineRecord>,
    by_id: HashMap<String, usize>,
}

impl GuidelineStore {
    /// Load a `.json` collection (bare array or versioned object) or a text
    /// file with one guideline per non-empty line.
    pub fn load(path: &Path) -> Result<Self, GuidelineError> {
        let content = fs::read_to_string(path).map_err(|source| GuidelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        let store = if is_text {
            Self::from_lines(&content)?
        } else {
            Self::from_json(&content).map_err(|e| match e {
                LoadError::Json(source) => GuidelineError::Parse {
                    path: path.to_path_buf(),
                    source,
                },
                LoadError::Invalid(e) => e,
            })?
        };

        info!(
            "loaded {} guidelines from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        let file: GuidelineFile = serde_json::from_str(content).map_err(LoadError::Json)?;
        let (version, records) = match file {
            GuidelineFile::Bare(records) => (None, records),
            GuidelineFile::Versioned { version, guidelines } => {
                if version != SUPPORTED_VERSION {
                    return Err(GuidelineError::UnsupportedVersion { found: version }.into());
                }
                (Some(version), guidelines)
            }
        };
        Ok(Self::from_records(version, records)?)
    }

    pub fn from_lines(content: &str) -> Result<Self, GuidelineError> {
        let records = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| GuidelineRecord {
                id: (i + 1).to_string(),
                texte: line.trim().to_string(),
                motif: String::new(),
                source: String::new(),
            })
            .collect();
        Self::from_records(None, records)
    }

    pub fn from_records(
        version: Option<u32>,
        records: Vec<GuidelineRecord>,
    ) -> Result<Self, GuidelineError> {
        let mut seen = HashSet::new();
        let mut by_id = HashMap::with_capacity(records.len());

        for (index, rec) in records.iter().enumerate() {
            if rec.id.trim().is_empty() {
                return Err(GuidelineError::EmptyId { index });
            }
            if rec.texte.trim().is_empty() {
                return Err(GuidelineError::EmptyText { id: rec.id.clone() });
            }
            if !seen.insert(rec.id.as_str()) {
                return Err(GuidelineError::DuplicateId { id: rec.id.clone() });
            }
            by_id.insert(rec.id.clone(), index);
        }
        debug!("validated {} guideline records", records.len());

        Ok(Self {
            version,
            records,
            by_id,
        })
    }

    pub fn records(&self) -> &[GuidelineRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&GuidelineRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// Record count per `motif`, sorted by motif.
    pub fn motif_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for rec in &self.records {
            *counts.entry(rec.motif.as_str()).or_default() += 1;
        }
        let mut counts: Vec<(String, usize)> =
            counts.into_iter().map(|(m, c)| (m.to_string(), c)).collect();
        counts.sort();
        counts
    }
}

/// Failure of [`GuidelineStore::from_json`], before a path is attached.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Json(serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] GuidelineError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bare_array() {
        let store = GuidelineStore::from_json(
            r#"[{"id":"g1","texte":"IRM cérébrale","motif":"céphalée","source":"HAS"},
                {"id":2,"texte":"Scanner thoracique"}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.version(), None);
        assert_eq!(store.get("2").unwrap().texte, "Scanner thoracique");
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn test_versioned_object() {
        let store = GuidelineStore::from_json(
            r#"{"version":1,"guidelines":[{"id":"a","texte":"Radiographie"}]}"#,
        )
        .unwrap();
        assert_eq!(store.version(), Some(1));
    }

    #[test]
    fn test_rejects_bad_records() {
        let err = GuidelineStore::from_json(
            r#"[{"id":"a","texte":"x"},{"id":"a","texte":"y"}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid(GuidelineError::DuplicateId { ref id }) if id == "a"
        ));

        let err = GuidelineStore::from_json(r#"[{"id":"a","texte":"  "}]"#).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(GuidelineError::EmptyText { .. })));

        let err = GuidelineStore::from_json(r#"{"version":2,"guidelines":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid(GuidelineError::UnsupportedVersion { found: 2 })
        ));
    }

    #[test]
    fn test_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "IRM cérébrale\n\nScanner abdominal").unwrap();

        let store = GuidelineStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("3").unwrap().texte, "Scanner abdominal");
    }

    #[test]
    fn test_missing_file() {
        let err = GuidelineStore::load(Path::new("/nonexistent/guidelines.json")).unwrap_err();
        assert!(matches!(err, GuidelineError::Io { .. }));
    }

    #[test]
    fn test_parse_error_keeps_path() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{not json").unwrap();
        let err = GuidelineStore::load(file.path()).unwrap_err();
        assert!(matches!(err, GuidelineError::Parse { .. }));
        assert!(err.to_string().contains(".json"));
    }
}
