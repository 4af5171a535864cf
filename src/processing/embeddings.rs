//! Embedding providers and vector similarity

use crate::config::Config;
use crate::error::{Result, ResumeRankerError};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Anything that turns text into a fixed-length vector.
///
/// Empty input must still produce a vector (usually all zeros) rather than an error.
pub trait EmbeddingProvider {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    fn model_name(&self) -> &str;
}

/// Model2Vec static embeddings
pub struct Model2VecProvider {
    model: StaticModel,
    model_name: String,
}

impl Model2VecProvider {
    pub fn load(model_path: &Path, model_name: impl Into<String>) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.into(),
        })
    }

    /// Load `requested` (or the configured default) from the models directory,
    /// falling back to the Hugging Face repo id
    pub fn from_config(config: &Config, requested: Option<&str>) -> Result<Self> {
        let name = requested.unwrap_or(&config.models.default_embedding_model);
        let path = resolve_model_path(config, name);
        Self::load(&path, name)
    }
}

impl EmbeddingProvider for Model2VecProvider {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        // The tokenizer panics on input it cannot handle; confine that to this text
        let embedding = panic::catch_unwind(AssertUnwindSafe(|| self.model.encode_single(text)))
            .map_err(|_| ResumeRankerError::Embedding("tokenizer failed on input text".to_string()))?;

        debug!("Encoded {} chars into {} dims", text.len(), embedding.len());
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Local model directory if present, otherwise the catalog repo id (or the name as given)
pub fn resolve_model_path(config: &Config, name: &str) -> PathBuf {
    let local_path = config.models_dir().join(name);
    if local_path.exists() {
        return local_path;
    }

    match config.get_model_by_name(name) {
        Some(model) => {
            let by_id = config.models_dir().join(&model.name);
            if by_id.exists() {
                by_id
            } else {
                PathBuf::from(&model.repo_id)
            }
        }
        None => PathBuf::from(name),
    }
}

/// Cosine similarity; zero when either vector is empty or has zero magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeRankerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.iter().chain(b.iter()).any(|x| !x.is_finite()) {
        return Err(ResumeRankerError::Embedding(
            "Embedding contains non-finite values".to_string(),
        ));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let v = [0.3, -1.2, 4.0];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors() {
        let score = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_vector_is_zero_similarity() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_resolve_unknown_model_uses_name() {
        let config = Config::default();
        assert_eq!(resolve_model_path(&config, "org/custom-model"), PathBuf::from("org/custom-model"));
    }

    #[test]
    fn test_resolve_catalog_model_uses_repo_id() {
        let mut config = Config::default();
        config.models.models_dir = PathBuf::from("/nonexistent/models");
        assert_eq!(
            resolve_model_path(&config, "potion-base-8M"),
            PathBuf::from("minishlab/potion-base-8M")
        );
    }
}
