//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("docx"), FileType::Docx);
        assert_eq!(FileType::from_extension("txt"), FileType::Text);
        assert_eq!(FileType::from_extension("markdown"), FileType::Markdown);
        assert_eq!(FileType::from_extension("doc"), FileType::Unknown);
    }

    #[test]
    fn test_path_without_extension() {
        assert_eq!(FileType::from_path(Path::new("resume")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("cv/jane.Docx")), FileType::Docx);
    }
}
