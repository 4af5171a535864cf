//! Semantic ranking of candidate documents against a reference text

use crate::error::Result;
use crate::processing::document::DocumentBatch;
use crate::processing::embeddings::{cosine_similarity, EmbeddingProvider};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: f32,
}

/// A candidate that could not be scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingFailure {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    /// Descending by score; equal scores keep batch order
    pub entries: Vec<RankingEntry>,
    /// In batch order
    pub failures: Vec<RankingFailure>,
}

impl RankingResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.failures.is_empty()
    }

    pub fn top(&self) -> Option<&RankingEntry> {
        self.entries.first()
    }

    pub fn score_of(&self, name: &str) -> Option<f32> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }
}

pub struct SimilarityRanker<'a, P: EmbeddingProvider> {
    provider: &'a P,
}

impl<'a, P: EmbeddingProvider> SimilarityRanker<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Score every candidate against `reference_text`.
    ///
    /// Fails only if the reference itself cannot be encoded. A candidate whose
    /// embedding fails is moved to `failures` and the rest are still scored.
    pub fn rank(&self, reference_text: &str, candidates: &DocumentBatch) -> Result<RankingResult> {
        let reference = self.provider.encode(reference_text)?;
        debug!(
            "Reference encoded with {} ({} dims)",
            self.provider.model_name(),
            reference.len()
        );

        let mut result = RankingResult::default();

        for document in candidates.iter() {
            let scored = self
                .provider
                .encode(&document.content)
                .and_then(|embedding| cosine_similarity(&reference, &embedding));

            match scored {
                Ok(score) => result.entries.push(RankingEntry {
                    name: document.name.clone(),
                    score,
                }),
                Err(e) => {
                    warn!("Could not score {}: {}", document.name, e);
                    result.failures.push(RankingFailure {
                        name: document.name.clone(),
                        message: "Could not compute a similarity score for this resume.".to_string(),
                    });
                }
            }
        }

        // Stable: ties stay in batch order
        result.entries.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(result)
    }
}
