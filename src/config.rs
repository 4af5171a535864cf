//! Configuration management for the resume ranker

use crate::error::{Result, ResumeRankerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
    pub available_models: Vec<AvailableModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: usize,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Characters of resume text shown by `--preview`
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub default_format: OutputFormat,
    pub output_dir: PathBuf,
    pub write_txt: bool,
    pub write_pdf: bool,
    pub write_chart: bool,
    pub write_json: bool,
    pub color_output: bool,
    pub page: PageConfig,
}

/// PDF page geometry, in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    pub left_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub line_spacing: f32,
    pub heading_gap: f32,
    pub font_size: f32,
    pub heading_font_size: f32,
    pub body_font_size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub sink: SinkKind,
    pub credentials_path: PathBuf,
    pub spreadsheet_name: String,
    pub spreadsheet_id: Option<String>,
    pub csv_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Console,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    GoogleSheets,
    Csv,
    Disabled,
}

impl Default for PageConfig {
    fn default() -> Self {
        // US letter
        Self {
            width: 612.0,
            height: 792.0,
            left_margin: 50.0,
            top_margin: 50.0,
            bottom_margin: 40.0,
            line_spacing: 15.0,
            heading_gap: 20.0,
            font_size: 12.0,
            heading_font_size: 12.0,
            body_font_size: 11.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-ranker")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
                available_models: vec![
                    AvailableModel {
                        name: "potion-base-8M".to_string(),
                        repo_id: "minishlab/potion-base-8M".to_string(),
                        size_mb: 33,
                        dimensions: 256,
                        description: "Model2Vec static embeddings, good quality/size balance".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-base".to_string(),
                        repo_id: "minishlab/M2V_base_output".to_string(),
                        size_mb: 90,
                        dimensions: 256,
                        description: "Fast Model2Vec base embeddings model".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-large".to_string(),
                        repo_id: "minishlab/M2V_large_output".to_string(),
                        size_mb: 250,
                        dimensions: 512,
                        description: "High-quality Model2Vec large embeddings model".to_string(),
                    },
                ],
            },
            processing: ProcessingConfig {
                preview_chars: 3000,
            },
            output: OutputConfig {
                default_format: OutputFormat::Console,
                output_dir: PathBuf::from("resume_feedback"),
                write_txt: true,
                write_pdf: true,
                write_chart: true,
                write_json: true,
                color_output: true,
                page: PageConfig::default(),
            },
            logging: LoggingConfig {
                sink: SinkKind::GoogleSheets,
                credentials_path: PathBuf::from("creds.json"),
                spreadsheet_name: "resume_score".to_string(),
                spreadsheet_id: None,
                csv_path: PathBuf::from("resume_scores.csv"),
            },
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeRankerError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &Path {
        &self.models.models_dir
    }

    pub fn get_model_by_name(&self, name: &str) -> Option<&AvailableModel> {
        self.models
            .available_models
            .iter()
            .find(|m| m.name == name || m.repo_id == name)
    }

    /// Service-account key location; `GOOGLE_APPLICATION_CREDENTIALS` wins over the config file
    pub fn credentials_path(&self) -> PathBuf {
        std::env::var_os("GOOGLE_APPLICATION_CREDENTIALS")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.logging.credentials_path.clone())
    }
}
