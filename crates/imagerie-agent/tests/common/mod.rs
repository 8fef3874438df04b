#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use imagerie_core::models::{GuidelineMetadata, SearchHit};
use imagerie_core::traits::{LlmClient, VectorSearch};

/// Replays canned completions in order and records every prompt.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(replies: &[&str]) -> Self {
        Self::with_results(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_results(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(anyhow!(e)),
            None => Err(anyhow!("script exhausted")),
        }
    }
}

/// Returns the same hits for every query.
pub struct FixedSearch {
    hits: Vec<SearchHit>,
}

impl FixedSearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self { hits }
    }

    pub fn empty() -> Self {
        Self { hits: Vec::new() }
    }
}

#[async_trait]
impl VectorSearch for FixedSearch {
    async fn query(&self, _text: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

pub fn hit(id: &str, text: &str, distance: f32) -> SearchHit {
    SearchHit {
        id: id.to_string(),
        text: text.to_string(),
        metadata: GuidelineMetadata {
            motif: "céphalée".to_string(),
            source: "HAS".to_string(),
        },
        distance,
    }
}

pub fn headache_hits() -> Vec<SearchHit> {
    vec![
        hit(
            "cephalee-urgence",
            "Céphalée brutale inhabituelle : scanner cérébral sans injection sans délai",
            0.15,
        ),
        hit(
            "cephalee-chronique",
            "Céphalée chronique sans signe d'alarme : pas d'imagerie systématique",
            0.35,
        ),
    ]
}
