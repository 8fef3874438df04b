//! In-memory nearest-neighbour index over the guideline store.

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use imagerie_core::guidelines::GuidelineStore;
use imagerie_core::models::{GuidelineRecord, SearchHit};
use imagerie_core::traits::{Embedder, VectorSearch};
use tracing::{debug, info};

/// `1 - cos(a, b)`. A zero vector is maximally unrelated (distance 1).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na * nb)
}

struct Entry {
    record: GuidelineRecord,
    vector: Vec<f32>,
}

pub struct VectorIndex {
    entries: Vec<Entry>,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    /// Embed every guideline text once.
    pub async fn build(store: &GuidelineStore, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let texts: Vec<String> = store.records().iter().map(|r| r.texte.clone()).collect();
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts).await?
        };
        if vectors.len() != texts.len() {
            return Err(anyhow!(
                "Embedder returned {} vectors for {} guidelines",
                vectors.len(),
                texts.len()
            ));
        }

        let entries = store
            .records()
            .iter()
            .cloned()
            .zip(vectors)
            .map(|(record, vector)| Entry { record, vector })
            .collect::<Vec<_>>();
        info!("indexed {} guidelines", entries.len());
        Ok(Self { entries, embedder })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl VectorSearch for VectorIndex {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        if self.entries.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        let query = self.embedder.embed(text).await?;

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .map(|e| SearchHit {
                id: e.record.id.clone(),
                text: e.record.texte.clone(),
                metadata: e.record.metadata(),
                distance: cosine_distance(&query, &e.vector),
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(top_k);
        debug!("query returned {} hits", hits.len());
        Ok(hits)
    }
}
