//! One ranking batch from uploaded files to logged rows and written artifacts

use crate::error::{Result, ResumeRankerError};
use crate::input::manager::{document_name, InputManager};
use crate::output::artifacts::{ArtifactWriter, BatchArtifacts};
use crate::processing::document::{Document, DocumentBatch, DocumentNotice};
use crate::processing::embeddings::EmbeddingProvider;
use crate::processing::feedback::{feedback, FeedbackReport};
use crate::processing::ranker::{RankingResult, SimilarityRanker};
use crate::sink::{LogRow, ResultSink};
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;

pub const MISSING_JOB_MESSAGE: &str = "Please provide a job description.";
pub const MISSING_RESUMES_MESSAGE: &str = "Please provide at least one resume.";
pub const UNREADABLE_JOB_MESSAGE: &str = "The job description file could not be read.";
const LOG_NOTICE_NAME: &str = "results log";

/// Where the job description comes from
#[derive(Debug, Clone)]
pub enum JobSource {
    File(PathBuf),
    Inline(String),
}

/// Everything a batch produced
#[derive(Debug)]
pub struct BatchReport {
    pub model_name: String,
    pub generated_at: DateTime<Local>,
    pub ranking: RankingResult,
    /// Ranked candidates first, in rank order, then unscored ones in batch order
    pub feedback: Vec<(String, FeedbackReport)>,
    pub documents: DocumentBatch,
    pub notices: Vec<DocumentNotice>,
    pub artifacts: Vec<PathBuf>,
    /// `None` when logging is disabled or the sink failed
    pub logged_rows: Option<usize>,
    pub sink: String,
}

pub struct BatchPipeline<P: EmbeddingProvider, S: ResultSink> {
    provider: P,
    sink: S,
    writer: Option<ArtifactWriter>,
    show_progress: bool,
}

impl<P: EmbeddingProvider, S: ResultSink> BatchPipeline<P, S> {
    pub fn new(provider: P, sink: S) -> Self {
        Self {
            provider,
            sink,
            writer: None,
            show_progress: false,
        }
    }

    pub fn with_artifacts(mut self, writer: ArtifactWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    async fn job_text(&self, job: &JobSource, input: &mut InputManager) -> Result<String> {
        let text = match job {
            JobSource::Inline(text) => text.clone(),
            JobSource::File(path) => input.extract_text(path).await.map_err(|e| {
                warn!("Job description could not be read from {}: {}", path.display(), e);
                ResumeRankerError::InvalidInput(UNREADABLE_JOB_MESSAGE.to_string())
            })?,
        };

        if text.trim().is_empty() {
            return Err(ResumeRankerError::InvalidInput(MISSING_JOB_MESSAGE.to_string()));
        }
        Ok(text)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }

    async fn extract_resumes(
        &self,
        resumes: &[PathBuf],
        input: &mut InputManager,
        notices: &mut Vec<DocumentNotice>,
    ) -> DocumentBatch {
        let bar = self.progress_bar(resumes.len());
        let mut documents = DocumentBatch::new();

        for path in resumes {
            let name = document_name(path);
            bar.set_message(name.clone());

            let extraction = input.extract_or_empty(path).await;
            if let Some(message) = extraction.notice {
                notices.push(DocumentNotice::new(name.clone(), message));
            }
            if documents.insert(Document::new(name.clone(), extraction.text)).is_some() {
                warn!("Duplicate resume name {}; keeping the last upload", name);
            }
            bar.inc(1);
        }

        bar.finish_and_clear();
        documents
    }

    async fn log_rows(&self, rows: &[LogRow], notices: &mut Vec<DocumentNotice>) -> Option<usize> {
        if !self.sink.is_enabled() {
            return None;
        }
        match self.sink.append_rows(rows).await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!("Failed to log results to {}: {}", self.sink.describe(), e);
                notices.push(DocumentNotice::new(LOG_NOTICE_NAME, "Results could not be logged."));
                None
            }
        }
    }

    pub async fn run(&self, job: &JobSource, resumes: &[PathBuf]) -> Result<BatchReport> {
        let mut input = InputManager::new();
        let job_text = self.job_text(job, &mut input).await?;

        if resumes.is_empty() {
            return Err(ResumeRankerError::InvalidInput(MISSING_RESUMES_MESSAGE.to_string()));
        }

        let mut notices = Vec::new();
        let documents = self.extract_resumes(resumes, &mut input, &mut notices).await;
        info!("Extracted {} resumes", documents.len());

        let ranking = SimilarityRanker::new(&self.provider).rank(&job_text, &documents)?;
        for failure in &ranking.failures {
            notices.push(DocumentNotice::new(failure.name.clone(), failure.message.clone()));
        }

        let feedback: Vec<(String, FeedbackReport)> = ranking
            .entries
            .iter()
            .map(|entry| entry.name.as_str())
            .chain(ranking.failures.iter().map(|failure| failure.name.as_str()))
            .filter_map(|name| documents.get(name))
            .map(|document| (document.name.clone(), feedback(&document.content, &job_text)))
            .collect();

        let generated_at = Local::now();
        let rows = LogRow::from_entries(&ranking.entries, &generated_at);
        let logged_rows = self.log_rows(&rows, &mut notices).await;

        let mut artifacts = Vec::new();
        if let Some(writer) = &self.writer {
            let outcome = writer
                .write_all(&BatchArtifacts {
                    model_name: self.provider.model_name(),
                    generated_at: &generated_at,
                    ranking: &ranking,
                    feedback: &feedback,
                })
                .await;
            artifacts = outcome.written;
            notices.extend(outcome.notices);
        }

        Ok(BatchReport {
            model_name: self.provider.model_name().to_string(),
            generated_at,
            ranking,
            feedback,
            documents,
            notices,
            artifacts,
            logged_rows,
            sink: self.sink.describe(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::DisabledSink;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// One dimension per vocabulary word
    struct WordCounts;

    impl EmbeddingProvider for WordCounts {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            let vocab = ["python", "developer", "sql", "java", "engineer", "rust"];
            let mut counts: HashMap<&str, f32> = HashMap::new();
            let lower = text.to_lowercase();
            for token in lower.split_whitespace() {
                *counts.entry(token).or_default() += 1.0;
            }
            Ok(vocab.iter().map(|w| counts.get(w).copied().unwrap_or(0.0)).collect())
        }

        fn model_name(&self) -> &str {
            "word-counts"
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_inline_job_ranks_and_explains() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.txt", "experienced python developer");
        let b = write(&dir, "b.txt", "java backend engineer");

        let pipeline = BatchPipeline::new(WordCounts, DisabledSink);
        let job = JobSource::Inline("python developer with sql experience".to_string());
        let report = pipeline.run(&job, &[b, a]).await.unwrap();

        assert_eq!(report.ranking.entries[0].name, "a.txt");
        assert_eq!(report.ranking.entries[1].name, "b.txt");
        assert_eq!(report.ranking.entries[1].score, 0.0);
        assert_eq!(report.feedback[0].0, "a.txt");
        assert_eq!(report.feedback[0].1.match_percent, 40.0);
        assert_eq!(report.feedback[1].1.match_percent, 0.0);
        assert!(report.notices.is_empty());
        assert_eq!(report.logged_rows, None);
        assert!(report.artifacts.is_empty());
    }

    #[tokio::test]
    async fn test_empty_job_is_rejected() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.txt", "python");
        let pipeline = BatchPipeline::new(WordCounts, DisabledSink);

        let result = pipeline.run(&JobSource::Inline("  \n".to_string()), &[a]).await;
        match result {
            Err(ResumeRankerError::InvalidInput(message)) => assert_eq!(message, MISSING_JOB_MESSAGE),
            other => panic!("expected invalid input, got {:?}", other.map(|r| r.model_name)),
        }
    }

    #[tokio::test]
    async fn test_corrupt_job_file_hides_parser_error() {
        let dir = TempDir::new().unwrap();
        let job = write(&dir, "job.pdf", "not a pdf at all");
        let a = write(&dir, "a.txt", "python");
        let pipeline = BatchPipeline::new(WordCounts, DisabledSink);

        let result = pipeline.run(&JobSource::File(job), &[a]).await;
        match result {
            Err(ResumeRankerError::InvalidInput(message)) => {
                assert_eq!(message, UNREADABLE_JOB_MESSAGE);
                assert!(!message.contains("job.pdf"));
            }
            other => panic!("expected invalid input, got {:?}", other.map(|r| r.model_name)),
        }
    }

    #[tokio::test]
    async fn test_no_resumes_is_rejected() {
        let pipeline = BatchPipeline::new(WordCounts, DisabledSink);
        let result = pipeline.run(&JobSource::Inline("python".to_string()), &[]).await;
        assert!(matches!(result, Err(ResumeRankerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unreadable_resume_scores_zero_with_notice() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.txt", "rust engineer");
        let odd = write(&dir, "notes.xyz", "rust engineer");

        let pipeline = BatchPipeline::new(WordCounts, DisabledSink);
        let report = pipeline
            .run(&JobSource::Inline("rust engineer".to_string()), &[odd, good])
            .await
            .unwrap();

        assert_eq!(report.ranking.entries.len(), 2);
        assert_eq!(report.ranking.top().unwrap().name, "good.txt");
        assert_eq!(report.ranking.score_of("notes.xyz"), Some(0.0));
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].name, "notes.xyz");
    }

    #[tokio::test]
    async fn test_duplicate_names_keep_last_text() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("one");
        let second = dir.path().join("two");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(first.join("cv.txt"), "java").unwrap();
        std::fs::write(second.join("cv.txt"), "rust").unwrap();

        let pipeline = BatchPipeline::new(WordCounts, DisabledSink);
        let report = pipeline
            .run(
                &JobSource::Inline("rust".to_string()),
                &[first.join("cv.txt"), second.join("cv.txt")],
            )
            .await
            .unwrap();

        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.ranking.entries.len(), 1);
        assert!((report.ranking.entries[0].score - 1.0).abs() < 1e-6);
    }
}
