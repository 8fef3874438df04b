//! Colored rendering of configuration errors for the terminal

use crate::error::ConfigError;
use std::fmt;
use yansi::Paint;

pub struct ErrorFormatter {
    error: ConfigError,
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new(error: ConfigError) -> Self {
        Self {
            error,
            use_colors: supports_color(),
        }
    }

    pub fn format(&self) -> String {
        if !self.use_colors {
            return self.error.to_string();
        }

        let cross = Paint::red("✗").bold();
        match &self.error {
            ConfigError::InvalidEnum {
                field,
                value,
                options,
                hint,
            } => format!(
                "{} {} does not accept {}\n  {} {}\n  {}",
                cross,
                Paint::cyan(field),
                Paint::yellow(&format!("'{}'", value)),
                Paint::new("options:").bold(),
                options,
                Paint::green(hint)
            ),
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => format!(
                "{} {} = {} (allowed {}..={})",
                cross,
                Paint::cyan(field),
                Paint::red(&value.to_string()),
                min,
                max
            ),
            ConfigError::InvalidInteger { field, value, min } => format!(
                "{} {} = {} (must be > {})",
                cross,
                Paint::cyan(field),
                Paint::red(&value.to_string()),
                min
            ),
            ConfigError::ParseError {
                format,
                location,
                message,
                context,
            } => format!(
                "{} {} config{}: {}\n{}",
                cross,
                Paint::new(format).bold(),
                location,
                message,
                Paint::new(context).dim()
            ),
            ConfigError::EnvVarError { var, message } => format!(
                "{} {}: {}\n  {}",
                cross,
                Paint::yellow(var),
                message,
                Paint::new("unset the variable or fix its value").dim()
            ),
            ConfigError::ValidationError { field, message } => {
                format!("{} {}: {}", cross, Paint::cyan(field), message)
            }
            ConfigError::FileNotFound { path } => format!(
                "{} no config at {}",
                cross,
                Paint::yellow(&path.display().to_string())
            ),
            other => format!("{} {}", cross, other),
        }
    }
}

fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stderr)
}

impl fmt::Display for ErrorFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_invalid_enum() {
        let error = ConfigError::invalid_enum("llm.provider", "olama", &["ollama", "openai"]);
        let formatter = ErrorFormatter {
            error,
            use_colors: false,
        };
        let output = formatter.format();
        assert!(output.contains("Invalid value 'olama'"));
        assert!(output.contains("Did you mean 'ollama'?"));
    }

    #[test]
    fn test_plain_cli_mode_error() {
        let error = ConfigError::invalid_enum("--mode", "retreival", &["llm", "retrieval", "decision_tree"]);
        let output = ErrorFormatter {
            error,
            use_colors: false,
        }
        .format();
        assert!(output.contains("--mode"));
        assert!(output.contains("Did you mean 'retrieval'?"));
    }

    #[test]
    fn test_plain_validation_error() {
        let formatter = ErrorFormatter {
            error: ConfigError::validation("llm.model", "Model name cannot be empty"),
            use_colors: false,
        };
        assert_eq!(
            formatter.to_string(),
            "Validation error: llm.model: Model name cannot be empty"
        );
    }
}
