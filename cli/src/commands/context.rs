use std::sync::Arc;

use anyhow::{Context, Result};
use imagerie_config::{Config, ConfigError, DialogueMode, Validate};
use imagerie_core::guidelines::GuidelineStore;
use imagerie_index::{select_embedder, VectorIndex};

use super::Cli;

/// Config file (explicit or discovered) plus environment, then CLI flags.
pub fn load_config(cli: &Cli) -> imagerie_config::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    if let Some(path) = &cli.guidelines {
        config.core.guidelines_path = path.clone();
    }
    if let Some(mode) = &cli.mode {
        config.dialogue.mode = DialogueMode::parse(mode)
            .ok_or_else(|| ConfigError::invalid_enum("--mode", mode, &DialogueMode::OPTIONS))?;
    }

    config.validate()?;
    Ok(config)
}

/// Guidelines loaded and embedded, ready to be searched.
pub struct AppContext {
    pub config: Config,
    pub store: GuidelineStore,
    pub index: Arc<VectorIndex>,
}

impl AppContext {
    pub async fn build(config: &Config) -> Result<Self> {
        let path = &config.core.guidelines_path;
        let store = GuidelineStore::load(path)
            .with_context(|| format!("failed to load guidelines from {}", path.display()))?;

        let embedder = select_embedder(&config.retrieval)?;
        let index = VectorIndex::build(&store, embedder).await?;

        Ok(Self {
            config: config.clone(),
            store,
            index: Arc::new(index),
        })
    }
}
