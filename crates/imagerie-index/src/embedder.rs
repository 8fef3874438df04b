use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use imagerie_config::{EmbeddingBackend, RetrievalConfig};
use imagerie_core::text::normalize;
use imagerie_core::traits::Embedder;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";
const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";

/// Build the embedder named by `config.embedding`.
pub fn select_embedder(config: &RetrievalConfig) -> Result<Arc<dyn Embedder>> {
    let model = config.embedding_model.clone();
    let embedder: Arc<dyn Embedder> = match config.embedding {
        EmbeddingBackend::Hash => Arc::new(HashEmbedder::new(config.hash_dimension)),
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(
            model.unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        )),
        EmbeddingBackend::OpenAi => {
            let api_key = env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set for the openai embedding backend")?;
            Arc::new(OpenAiEmbedder::new(
                model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                api_key,
            ))
        }
    };
    info!("using {:?} embedder", config.embedding);
    Ok(embedder)
}

/// Offline embedder: signed feature hashing of accent-folded word unigrams
/// and bigrams, L2-normalised.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let folded = normalize(text);
        let words: Vec<&str> = folded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 1)
            .collect();

        let mut vector = vec![0.0f32; self.dimension];
        let mut add = |feature: &str, weight: f32| {
            let h = fnv1a(feature.as_bytes());
            let slot = (h % self.dimension as u64) as usize;
            let sign = if (h >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            vector[slot] += sign * weight;
        };
        for word in &words {
            add(word, 1.0);
        }
        for pair in words.windows(2) {
            add(&format!("{} {}", pair[0], pair[1]), 0.5);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |h, b| (h ^ *b as u64).wrapping_mul(PRIME))
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

pub struct OpenAiEmbedder {
    model: String,
    api_key: String,
    base_url: String,
    client: Client,
}

impl OpenAiEmbedder {
    pub fn new(model: String, api_key: String) -> Self {
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        Self {
            model,
            api_key,
            base_url,
            client: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingItem {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut list = self.embed_batch(&[text.to_string()]).await?;
        list.pop().ok_or_else(|| anyhow!("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let resp = self
            .client
            .post(format!("{}/embeddings", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI embeddings failed ({}): {}", status, body));
        }

        let parsed: OpenAiEmbeddingResponse = resp.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(anyhow!(
                "Embedding count mismatch: got {}, expected {}",
                parsed.data.len(),
                texts.len()
            ));
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

pub struct OllamaEmbedder {
    model: String,
    base_url: String,
    client: Client,
}

impl OllamaEmbedder {
    pub fn new(model: String) -> Self {
        let base_url =
            env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
        Self {
            model,
            base_url,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let resp = self
            .client
            .post(format!("{}/api/embeddings", self.base_url.trim_end_matches('/')))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": text,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama embeddings failed ({}): {}", status, body));
        }

        let json: serde_json::Value = resp.json().await?;
        let embedding = json["embedding"]
            .as_array()
            .ok_or_else(|| anyhow!("No embedding field in Ollama response"))?
            .iter()
            .filter_map(|v| v.as_f64())
            .map(|f| f as f32)
            .collect::<Vec<f32>>();
        debug!("ollama embedding of dimension {}", embedding.len());
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embedding_is_unit_length() {
        let e = HashEmbedder::new(64);
        let v = e.embed_text("Scanner cérébral sans injection");
        assert_eq!(v.len(), 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hash_embedding_ignores_accents_and_case() {
        let e = HashEmbedder::new(128);
        assert_eq!(e.embed_text("Céphalée BRUTALE"), e.embed_text("cephalee brutale"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let e = HashEmbedder::new(32);
        assert!(e.embed_text("  ?! ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_select_hash_backend() {
        let config = RetrievalConfig {
            hash_dimension: 100,
            ..Default::default()
        };
        assert!(select_embedder(&config).is_ok());
    }
}
