//! Document structures for a ranking batch

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// An uploaded document reduced to its extracted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// True when extraction produced nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// First `max_chars` characters, cut on a grapheme boundary
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.content.grapheme_indices(true).nth(max_chars) {
            Some((byte_idx, _)) => &self.content[..byte_idx],
            None => &self.content,
        }
    }
}

/// Candidate documents keyed by name, in upload order.
///
/// Re-inserting a name replaces its text but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentBatch {
    documents: IndexMap<String, Document>,
}

impl DocumentBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous document stored under the same name, if any
    pub fn insert(&mut self, document: Document) -> Option<Document> {
        self.documents.insert(document.name.clone(), document)
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for DocumentBatch {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut batch = DocumentBatch::new();
        for document in iter {
            batch.insert(document);
        }
        batch
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for DocumentBatch {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, text)| Document::new(name, text))
            .collect()
    }
}

/// Short user-facing message about one document; details go to the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNotice {
    pub name: String,
    pub message: String,
}

impl DocumentNotice {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}
