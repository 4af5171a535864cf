//! Text extraction from various file formats

use crate::error::{Result, ResumeRankerError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let pages = guard_pdf_parser(path, || pdf_extract::extract_text_from_mem_by_pages(&bytes))?
            .map_err(|e| {
                ResumeRankerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
            })?;
        Ok(join_pages(pages))
    }
}

/// pdf-extract panics on some fonts and encodings; turn that into an error for this file only
pub fn guard_pdf_parser<T, F>(path: &Path, parse: F) -> Result<T>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(parse)).map_err(|_| {
        ResumeRankerError::PdfExtraction(format!("PDF parser failed on '{}'", path.display()))
    })
}

/// Pages without extractable text are skipped; the rest are joined with a single space
pub fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        String::from_utf8(bytes).map_err(|e| {
            ResumeRankerError::InvalidInput(format!("'{}' is not valid UTF-8: {}", path.display(), e))
        })
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        // Work from a private temporary copy so the upload itself is never held open
        let mut temp = tempfile::Builder::new().suffix(".docx").tempfile()?;
        temp.write_all(&bytes)?;
        temp.flush()?;

        let file = temp.reopen()?;
        let mut archive = zip::ZipArchive::new(file)?;
        let mut document_xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| {
                ResumeRankerError::DocxExtraction(format!("'{}' has no document body: {}", path.display(), e))
            })?
            .read_to_string(&mut document_xml)?;

        Ok(self.xml_to_text(&document_xml))
    }
}

impl DocxExtractor {
    /// Keeps only visible run text: field codes, tracked deletions and paragraph
    /// properties (tab stop definitions) are dropped
    pub fn xml_to_text(&self, xml: &str) -> String {
        let hidden_re = Regex::new(
            r"(?s)<w:(instrText|delText|delInstrText|pPr)\b[^>]*?(?:/>|>.*?</w:(?:instrText|delText|delInstrText|pPr)>)",
        )
        .expect("Invalid tag regex");
        let tab_re = Regex::new(r"<w:tab\b[^>]*/>").expect("Invalid tag regex");
        let break_re = Regex::new(r"<w:(?:br|cr)\b[^>]*/>").expect("Invalid tag regex");
        let tag_re = Regex::new(r"<[^>]*>").expect("Invalid tag regex");

        let visible = hidden_re.replace_all(xml, "");
        let text = visible.replace("</w:p>", "\n");
        let text = tab_re.replace_all(&text, "\t");
        let text = break_re.replace_all(&text, "\n");
        let stripped = tag_re.replace_all(&text, "");

        let decoded = decode_entities(&stripped);

        decoded
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        let text = html.replace("<br>", "\n").replace("</p>", "\n\n");

        let re = Regex::new(r"<[^>]*>").expect("Invalid tag regex");
        let clean_text = decode_entities(&re.replace_all(&text, ""));

        clean_text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn decode_entities(text: &str) -> String {
    // &amp; last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
