use anyhow::Result;
use async_trait::async_trait;

use crate::models::SearchHit;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Nearest-neighbour lookup over the guideline collection.
///
/// Hits come back ordered by ascending distance.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<SearchHit>>;
}

/// A single-shot text completion service.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
