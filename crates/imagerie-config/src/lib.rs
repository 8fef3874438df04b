//! Configuration management for the imagerie assistant
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + CLI)
//!
//! # Example
//!
//! ```no_run
//! use imagerie_config::Config;
//!
//! // Load from default location (.imagerie.{toml,yml,json})
//! let config = Config::load()?;
//!
//! let top_k = config.retrieval.top_k;
//! let mode = config.dialogue.mode;
//! # Ok::<(), imagerie_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, ErrorFormatter, Result};
pub use loader::ConfigBuilder;
pub use types::*;

pub use validation::Validate;
