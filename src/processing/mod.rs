//! Scoring: documents, embeddings, similarity ranking and keyword feedback

pub mod document;
pub mod embeddings;
pub mod feedback;
pub mod model_manager;
pub mod ranker;
