//! Error types for configuration loading and validation

pub mod format;

use std::path::PathBuf;
use thiserror::Error;

pub use format::ErrorFormatter;

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unknown configuration format
    #[error("Unknown configuration format for file: {path}\nSupported formats: .yml, .yaml, .toml, .json")]
    UnknownFormat { path: PathBuf },

    /// Parse error in one of the supported formats, with an excerpt of the offending lines
    #[error("Failed to parse {format} configuration{location}:\n{message}\n{context}")]
    ParseError {
        format: &'static str,
        location: String,
        message: String,
        context: String,
    },

    #[error("Failed to read configuration file: {path}\n{source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid enum value
    #[error("Invalid value '{value}' for {field}\n  Valid options: {options}\n  Hint: {hint}")]
    InvalidEnum {
        field: String,
        value: String,
        options: String,
        hint: String,
    },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field} must be > {min}, got {value}")]
    InvalidInteger {
        field: String,
        value: usize,
        min: usize,
    },

    /// Environment variable parsing error
    #[error("Failed to parse environment variable {var}: {message}")]
    EnvVarError { var: String, message: String },

    /// Generic validation error
    #[error("Validation error: {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl ConfigError {
    /// Create an invalid enum error with a suggestion
    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        options: &[&str],
    ) -> Self {
        let value = value.into();
        let hint = suggest_option(&value, options);
        Self::InvalidEnum {
            field: field.into(),
            value,
            options: options.join(", "),
            hint,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn from_yaml_error(err: serde_yaml::Error, content: &str, path: Option<&str>) -> Self {
        let context = err
            .location()
            .map(|loc| excerpt(content, loc.line(), Some(loc.column())))
            .unwrap_or_default();
        Self::ParseError {
            format: "YAML",
            location: location(path),
            message: err.to_string(),
            context,
        }
    }

    pub fn from_toml_error(err: toml::de::Error, content: &str, path: Option<&str>) -> Self {
        let context = err
            .span()
            .map(|span| {
                let line = content[..span.start].matches('\n').count() + 1;
                excerpt(content, line, None)
            })
            .unwrap_or_default();
        Self::ParseError {
            format: "TOML",
            location: location(path),
            message: err.message().to_string(),
            context,
        }
    }

    pub fn from_json_error(err: serde_json::Error, content: &str, path: Option<&str>) -> Self {
        Self::ParseError {
            format: "JSON",
            location: location(path),
            message: err.to_string(),
            context: excerpt(content, err.line(), Some(err.column())),
        }
    }
}

fn location(path: Option<&str>) -> String {
    path.map(|p| format!(" in {}", p)).unwrap_or_default()
}

/// Suggest the closest valid option when the typo is small enough
fn suggest_option(input: &str, options: &[&str]) -> String {
    let input = input.to_lowercase();
    let closest = options
        .iter()
        .map(|opt| (opt, edit_distance(&input, &opt.to_lowercase())))
        .min_by_key(|(_, d)| *d);

    match closest {
        Some((opt, d)) if d <= 3 => format!("Did you mean '{}'?", opt),
        _ => "Check your configuration file".to_string(),
    }
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut curr = Vec::with_capacity(b_chars.len() + 1);
        curr.push(i + 1);
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            let best = (curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
            curr.push(best);
        }
        prev = curr;
    }

    prev.last().copied().unwrap_or(0)
}

/// Render the line before, the offending line (marked with an arrow) and the line after.
fn excerpt(content: &str, line_num: usize, column: Option<usize>) -> String {
    let lines: Vec<&str> = content.lines().collect();
    if line_num == 0 || line_num > lines.len() {
        return String::new();
    }

    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            if num != line_num {
                return format!("  {:3} | {}", num, line);
            }
            let mut marked = format!("→ {:3} | {}", num, line);
            if let Some(col) = column.filter(|c| *c > 0) {
                marked.push_str(&format!("\n        {}^", " ".repeat(col - 1)));
            }
            marked
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggests_close_option() {
        let err = ConfigError::invalid_enum("dialogue.mode", "retreival", &["llm", "retrieval"]);
        match err {
            ConfigError::InvalidEnum { hint, .. } => assert_eq!(hint, "Did you mean 'retrieval'?"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_no_suggestion_for_distant_value() {
        assert_eq!(
            suggest_option("completely-off", &["llm", "retrieval"]),
            "Check your configuration file"
        );
    }

    #[test]
    fn test_excerpt_marks_line() {
        let content = "a = 1\nb = oops\nc = 3";
        let out = excerpt(content, 2, Some(5));
        assert!(out.contains("→   2 | b = oops"));
        assert!(out.contains("  1 | a = 1"));
        assert!(out.contains("^"));
    }

    #[test]
    fn test_excerpt_out_of_bounds() {
        assert!(excerpt("a", 5, None).is_empty());
    }
}
