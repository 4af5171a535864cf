//! Input manager for handling different file types

use crate::error::{Result, ResumeRankerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

/// Result of a permissive extraction: the text (possibly empty) and,
/// when extraction failed, a short message fit for the user
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub notice: Option<String>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Docx => {
                info!("Extracting text from DOCX: {}", path.display());
                DocxExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeRankerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Extract text, degrading any failure to an empty string plus a notice
    pub async fn extract_or_empty(&mut self, path: &Path) -> Extraction {
        match self.extract_text(path).await {
            Ok(text) => {
                let notice = if text.trim().is_empty() {
                    warn!("No extractable text in {}", path.display());
                    Some("No text could be extracted from this file.".to_string())
                } else {
                    None
                };
                Extraction { text, notice }
            }
            Err(e) => {
                warn!("Text extraction failed for {}: {}", path.display(), e);
                let notice = match e {
                    ResumeRankerError::UnsupportedFormat(_) => {
                        "Unsupported file type; expected .pdf, .docx, .txt or .md."
                    }
                    ResumeRankerError::InvalidInput(_) => "File could not be read.",
                    _ => "Text extraction failed for this file.",
                };
                Extraction {
                    text: String::new(),
                    notice: Some(notice.to_string()),
                }
            }
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Display name of an uploaded file: its file name, falling back to the full path
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_document_name() {
        assert_eq!(document_name(Path::new("uploads/jane_doe.pdf")), "jane_doe.pdf");
        assert_eq!(document_name(&PathBuf::from("resume.docx")), "resume.docx");
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_empty() {
        let mut manager = InputManager::new();
        let extraction = manager.extract_or_empty(Path::new("does/not/exist.txt")).await;
        assert!(extraction.text.is_empty());
        assert_eq!(extraction.notice.as_deref(), Some("File could not be read."));
    }

    #[tokio::test]
    async fn test_empty_text_file_produces_notice() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        let extraction = manager.extract_or_empty(&path).await;
        assert_eq!(extraction.text, "  \n");
        assert!(extraction.notice.is_some());
        assert_eq!(manager.cache_size(), 0);
    }
}
