//! Environment variable configuration overlay
//!
//! Variables follow `IMAGERIE_<SECTION>_<FIELD>=value`, for example:
//! - `IMAGERIE_DIALOGUE_MODE=llm`
//! - `IMAGERIE_RETRIEVAL_TOP_K=8`
//! - `IMAGERIE_LLM_API_BASE=http://gpu-box:11434`

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const PREFIX: &str = "IMAGERIE_";

/// Apply every `IMAGERIE_*` variable of the process environment to `config`.
pub fn apply_env(config: &mut Config) -> usize {
    apply_vars(config, env::vars())
}

/// Same as [`apply_env`] over an explicit list of variables.
///
/// Variables are written straight onto the accumulated config, so a value
/// equal to the default still replaces what an earlier layer set. Malformed
/// variables are reported on stderr and skipped. Returns how many applied.
pub fn apply_vars<I>(config: &mut Config, vars: I) -> usize
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut applied = 0;
    for (key, value) in vars.into_iter().filter(|(k, _)| k.starts_with(PREFIX)) {
        match apply_env_var(config, &key, &value) {
            Ok(()) => applied += 1,
            Err(e) => eprintln!("Warning: ignoring {}: {}", key, e),
        }
    }
    applied
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let stripped = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = stripped.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: IMAGERIE_<section>_<field>".to_string(),
        });
    };
    let section = section.to_lowercase();
    let field = field.to_lowercase();

    match section.as_str() {
        "core" => apply_core_var(&mut config.core, key, &field, value),
        "retrieval" => apply_retrieval_var(&mut config.retrieval, key, &field, value),
        "llm" => apply_llm_var(&mut config.llm, key, &field, value),
        "dialogue" => apply_dialogue_var(&mut config.dialogue, key, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn parse_num<T: FromStr>(var: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Invalid number: {}", value),
    })
}

fn unknown_field(var: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Unknown field: {}", field),
    }
}

fn apply_core_var(config: &mut CoreConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "guidelines_path" => config.guidelines_path = PathBuf::from(value),
        "output_dir" => config.output_dir = PathBuf::from(value),
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_retrieval_var(
    config: &mut RetrievalConfig,
    var: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    match field {
        "top_k" => config.top_k = parse_num(var, value)?,
        "context_k" => config.context_k = parse_num(var, value)?,
        "hash_dimension" => config.hash_dimension = parse_num(var, value)?,
        "embedding_model" => config.embedding_model = Some(value.to_string()),
        "embedding" => {
            config.embedding = EmbeddingBackend::parse(value).ok_or_else(|| {
                ConfigError::invalid_enum("retrieval.embedding", value, &EmbeddingBackend::OPTIONS)
            })?;
        }
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_llm_var(config: &mut LlmConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "model" => config.model = value.to_string(),
        "api_base" => config.api_base = Some(value.to_string()),
        "temperature" => config.temperature = parse_num(var, value)?,
        "max_tokens" => config.max_tokens = parse_num(var, value)?,
        "timeout_secs" => config.timeout_secs = parse_num(var, value)?,
        "max_retries" => config.max_retries = parse_num(var, value)?,
        "provider" => {
            config.provider = LlmProvider::parse(value).ok_or_else(|| {
                ConfigError::invalid_enum("llm.provider", value, &LlmProvider::OPTIONS)
            })?;
        }
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_dialogue_var(
    config: &mut DialogueConfig,
    var: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    match field {
        "mode" => {
            config.mode = DialogueMode::parse(value).ok_or_else(|| {
                ConfigError::invalid_enum("dialogue.mode", value, &DialogueMode::OPTIONS)
            })?;
        }
        "max_clarification_rounds" => config.max_clarification_rounds = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}
