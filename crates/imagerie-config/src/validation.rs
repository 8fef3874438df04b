//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Implemented by every config section; `Config::validate` calls each one in turn.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Helper function to validate value is within range
pub fn validate_range(field: impl Into<String>, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Helper function to validate integer is above minimum
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

/// Checks that an optional endpoint override looks like an http(s) URL
pub fn validate_url(field: impl Into<String>, value: Option<&str>) -> Result<()> {
    let Some(url) = value else {
        return Ok(());
    };
    let field = field.into();
    if url.is_empty() {
        return Err(ConfigError::validation(
            field,
            "URL cannot be empty string (use null to unset)",
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::validation(
            field,
            format!("must start with http:// or https://, got: {}", url),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        assert!(validate_range("t", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("t", 1.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_positive() {
        assert!(validate_positive("t", 5, 0).is_ok());
        assert!(validate_positive("t", 0, 0).is_err());
    }

    #[test]
    fn test_url() {
        assert!(validate_url("t", None).is_ok());
        assert!(validate_url("t", Some("http://localhost:11434")).is_ok());
        assert!(validate_url("t", Some("localhost")).is_err());
        assert!(validate_url("t", Some("")).is_err());
    }
}
