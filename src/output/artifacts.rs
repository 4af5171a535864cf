//! Files written for a batch: per-resume feedback, combined PDF, chart, JSON ranking

use crate::config::OutputConfig;
use crate::error::Result;
use crate::output::chart::ChartLayout;
use crate::output::formatter::{JsonFormatter, RankingDocument};
use crate::output::pdf::PdfRenderer;
use crate::processing::document::DocumentNotice;
use crate::processing::feedback::FeedbackReport;
use crate::processing::ranker::RankingResult;
use chrono::{DateTime, Local};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const COMBINED_PDF: &str = "combined_resume_feedback.pdf";
pub const CHART_PDF: &str = "ranking_chart.pdf";
pub const RANKING_JSON: &str = "ranking.json";

/// Which artifacts to produce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtifactOptions {
    pub txt: bool,
    pub pdf: bool,
    pub chart: bool,
    pub json: bool,
}

impl From<&OutputConfig> for ArtifactOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            txt: config.write_txt,
            pdf: config.write_pdf,
            chart: config.write_chart,
            json: config.write_json,
        }
    }
}

#[derive(Debug, Default)]
pub struct ArtifactOutcome {
    pub written: Vec<PathBuf>,
    pub notices: Vec<DocumentNotice>,
}

/// What a batch hands over to be written
pub struct BatchArtifacts<'a> {
    pub model_name: &'a str,
    pub generated_at: &'a DateTime<Local>,
    pub ranking: &'a RankingResult,
    pub feedback: &'a [(String, FeedbackReport)],
}

pub struct ArtifactWriter {
    output_dir: PathBuf,
    options: ArtifactOptions,
    renderer: PdfRenderer,
}

/// `{name}_feedback.{ext}` with path separators neutralized
pub fn feedback_file_name(name: &str, ext: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let safe = safe.trim_start_matches('.');
    let safe = if safe.is_empty() { "resume" } else { safe };
    format!("{}_feedback.{}", safe, ext)
}

impl ArtifactWriter {
    pub fn new(output_dir: PathBuf, options: ArtifactOptions, renderer: PdfRenderer) -> Self {
        Self {
            output_dir,
            options,
            renderer,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(
            config.output_dir.clone(),
            ArtifactOptions::from(config),
            PdfRenderer::new(config.page.clone()),
        )
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write_file(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, bytes).await?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Write every enabled artifact; one failing file never stops the others
    pub async fn write_all(&self, batch: &BatchArtifacts<'_>) -> ArtifactOutcome {
        let mut outcome = ArtifactOutcome::default();

        if let Err(e) = fs::create_dir_all(&self.output_dir).await {
            warn!("Failed to create output directory {}: {}", self.output_dir.display(), e);
            outcome.notices.push(DocumentNotice::new(
                self.output_dir.display().to_string(),
                "Output directory could not be created; no files were written.",
            ));
            return outcome;
        }

        for (name, report) in batch.feedback {
            if self.options.txt {
                let file_name = feedback_file_name(name, "txt");
                let result = self.write_file(&file_name, report.render_text().as_bytes()).await;
                record(&mut outcome, result, name, "Feedback text file could not be written.");
            }

            if self.options.pdf {
                let file_name = feedback_file_name(name, "pdf");
                let result = match self.renderer.render_feedback(name, report) {
                    Ok(bytes) => self.write_file(&file_name, &bytes).await,
                    Err(e) => Err(e),
                };
                record(&mut outcome, result, name, "Feedback PDF could not be rendered.");
            }
        }

        if self.options.pdf {
            let result = match self.renderer.render_combined(batch.feedback) {
                Ok(bytes) => self.write_file(COMBINED_PDF, &bytes).await,
                Err(e) => Err(e),
            };
            record(&mut outcome, result, COMBINED_PDF, "Combined feedback PDF could not be rendered.");
        }

        if self.options.chart {
            let chart = ChartLayout::from_entries(&batch.ranking.entries);
            let result = match self.renderer.render_chart(&chart) {
                Ok(bytes) => self.write_file(CHART_PDF, &bytes).await,
                Err(e) => Err(e),
            };
            record(&mut outcome, result, CHART_PDF, "Ranking chart could not be rendered.");
        }

        if self.options.json {
            let document = RankingDocument::new(
                batch.model_name,
                batch.generated_at,
                batch.ranking,
                batch.feedback,
            );
            let result = match JsonFormatter::new(true).format_ranking(&document) {
                Ok(json) => self.write_file(RANKING_JSON, json.as_bytes()).await,
                Err(e) => Err(e),
            };
            record(&mut outcome, result, RANKING_JSON, "Ranking JSON could not be written.");
        }

        outcome
    }
}

fn record(outcome: &mut ArtifactOutcome, result: Result<PathBuf>, name: &str, message: &str) {
    match result {
        Ok(path) => outcome.written.push(path),
        Err(e) => {
            warn!("{} ({}): {}", message, name, e);
            outcome.notices.push(DocumentNotice::new(name, message));
        }
    }
}
