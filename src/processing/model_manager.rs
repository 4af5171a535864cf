//! Download and inspection of Model2Vec embedding models

use crate::config::{AvailableModel, Config};
use crate::error::{Result, ResumeRankerError};
use hf_hub::api::tokio::Api;
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files Model2Vec needs to load a model from a local directory
pub const REQUIRED_FILES: [&str; 3] = ["model.safetensors", "tokenizer.json", "config.json"];

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    catalog: Vec<AvailableModel>,
}

#[derive(Debug, Clone)]
pub struct ModelStatus {
    pub model: AvailableModel,
    pub downloaded: bool,
    pub path: PathBuf,
}

impl EmbeddingModelManager {
    pub async fn new(config: &Config) -> Result<Self> {
        let models_dir = config.models_dir().to_path_buf();
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            ResumeRankerError::Model(format!("Failed to create models directory: {}", e))
        })?;

        Ok(Self {
            models_dir,
            catalog: config.models.available_models.clone(),
        })
    }

    pub fn model_dir(&self, name: &str) -> PathBuf {
        self.models_dir.join(name)
    }

    pub fn resolve(&self, input: &str) -> Option<&AvailableModel> {
        let input_lower = input.to_lowercase();
        self.catalog
            .iter()
            .find(|m| m.name == input || m.repo_id == input || m.name.to_lowercase() == input_lower)
    }

    pub async fn is_downloaded(&self, name: &str) -> bool {
        is_model_directory(&self.model_dir(name)).await
    }

    pub async fn list(&self) -> Vec<ModelStatus> {
        let mut statuses = Vec::with_capacity(self.catalog.len());
        for model in &self.catalog {
            let path = self.model_dir(&model.name);
            statuses.push(ModelStatus {
                downloaded: is_model_directory(&path).await,
                model: model.clone(),
                path,
            });
        }
        statuses
    }

    /// Fetch a catalog model from the Hugging Face Hub into the models directory
    pub async fn download(&self, input: &str, force: bool) -> Result<PathBuf> {
        let model = self
            .resolve(input)
            .ok_or_else(|| ResumeRankerError::Model(format!("Unknown embedding model: {}", input)))?
            .clone();

        let model_dir = self.model_dir(&model.name);
        if !force && is_model_directory(&model_dir).await {
            info!("Model {} already present at {}", model.name, model_dir.display());
            return Ok(model_dir);
        }

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| ResumeRankerError::Model(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model.repo_id.clone());

        for file in &REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                ResumeRankerError::Model(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                ResumeRankerError::Model(format!("Failed to copy {}: {}", file, e))
            })?;
            info!("Downloaded {} for {}", file, model.name);
        }

        Ok(model_dir)
    }
}

pub async fn is_model_directory(path: &Path) -> bool {
    for file in &REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.models.models_dir = dir.join("models");
        config
    }

    #[tokio::test]
    async fn test_manager_creates_models_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());
        let manager = EmbeddingModelManager::new(&config).await.unwrap();

        assert!(config.models_dir().exists());
        assert!(manager.list().await.iter().all(|s| !s.downloaded));
    }

    #[tokio::test]
    async fn test_resolve_model() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(&config_in(temp_dir.path())).await.unwrap();

        assert!(manager.resolve("potion-base-8M").is_some());
        assert!(manager.resolve("minishlab/potion-base-8M").is_some());
        assert!(manager.resolve("POTION-BASE-8M").is_some());
        assert!(manager.resolve("gpt-2").is_none());
    }

    #[tokio::test]
    async fn test_detects_complete_model_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(temp_dir.path());
        let manager = EmbeddingModelManager::new(&config).await.unwrap();

        let dir = manager.model_dir("m2v-base");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tokenizer.json"), "{}").unwrap();
        assert!(!manager.is_downloaded("m2v-base").await);

        std::fs::write(dir.join("model.safetensors"), "").unwrap();
        std::fs::write(dir.join("config.json"), "{}").unwrap();
        assert!(manager.is_downloaded("m2v-base").await);
    }

    #[tokio::test]
    async fn test_unknown_model_download_fails() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(&config_in(temp_dir.path())).await.unwrap();
        assert!(manager.download("not-a-model", false).await.is_err());
    }
}
