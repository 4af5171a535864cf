//! Error handling for the resume ranker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeRankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Results sink error: {0}")]
    Sink(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ResumeRankerError>;

/// The Model2Vec loader reports failures through anyhow
impl From<anyhow::Error> for ResumeRankerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeRankerError::Model(err.to_string())
    }
}

impl From<zip::result::ZipError> for ResumeRankerError {
    fn from(err: zip::result::ZipError) -> Self {
        ResumeRankerError::DocxExtraction(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ResumeRankerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ResumeRankerError::Sink(format!("Failed to sign service account token: {}", err))
    }
}
