//! Console and JSON presentation of a ranked batch

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::chart::ChartLayout;
use crate::pipeline::BatchReport;
use crate::processing::document::DocumentNotice;
use crate::processing::feedback::FeedbackReport;
use crate::processing::ranker::{RankingFailure, RankingResult};
use chrono::{DateTime, Local};
use colored::{Color, Colorize};
use serde::Serialize;
use std::path::PathBuf;

pub const NAME_COLUMN: &str = "Resume Name";
pub const SCORE_COLUMN: &str = "Similarity Score";

/// Trait for formatting batch reports
pub trait OutputFormatter {
    fn format_batch(&self, report: &BatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal report: table, chart, feedback, notices
pub struct ConsoleFormatter {
    use_colors: bool,
    preview_chars: Option<usize>,
    chart_width: usize,
}

/// JSON formatter for scripting and `ranking.json`
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Debug, Serialize)]
pub struct RankingRow<'a> {
    pub rank: usize,
    pub resume_name: &'a str,
    pub similarity_score: f32,
}

#[derive(Debug, Serialize)]
pub struct FeedbackRow<'a> {
    pub resume_name: &'a str,
    pub report: &'a FeedbackReport,
    pub text: String,
}

/// Serialized ranking, also written as `ranking.json`
#[derive(Debug, Serialize)]
pub struct RankingDocument<'a> {
    pub generated_at: String,
    pub model: &'a str,
    pub ranking: Vec<RankingRow<'a>>,
    pub failures: &'a [RankingFailure],
    pub feedback: Vec<FeedbackRow<'a>>,
}

#[derive(Debug, Serialize)]
struct BatchSummary<'a> {
    #[serde(flatten)]
    document: RankingDocument<'a>,
    notices: &'a [DocumentNotice],
    artifacts: &'a [PathBuf],
    logged_rows: Option<usize>,
    sink: &'a str,
}

impl<'a> RankingDocument<'a> {
    pub fn new(
        model: &'a str,
        generated_at: &DateTime<Local>,
        ranking: &'a RankingResult,
        feedback: &'a [(String, FeedbackReport)],
    ) -> Self {
        Self {
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            model,
            ranking: ranking
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| RankingRow {
                    rank: i + 1,
                    resume_name: &entry.name,
                    similarity_score: entry.score,
                })
                .collect(),
            failures: &ranking.failures,
            feedback: feedback
                .iter()
                .map(|(name, report)| FeedbackRow {
                    resume_name: name,
                    report,
                    text: report.render_text(),
                })
                .collect(),
        }
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            preview_chars: None,
            chart_width: 40,
        }
    }

    /// Also print the start of each extracted resume
    pub fn with_preview(mut self, max_chars: usize) -> Self {
        self.preview_chars = Some(max_chars);
        self
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn score_color(score: f32) -> Color {
        if score >= 0.7 {
            Color::Green
        } else if score >= 0.4 {
            Color::Yellow
        } else {
            Color::Red
        }
    }

    /// Two-column ranking table, best first
    pub fn format_table(&self, ranking: &RankingResult) -> String {
        let name_width = ranking
            .entries
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(NAME_COLUMN.len());

        let mut out = String::new();
        let header = format!("{:<width$}  {}", NAME_COLUMN, SCORE_COLUMN, width = name_width);
        out.push_str(&self.colorize(&header, Color::Cyan));
        out.push('\n');
        out.push_str(&"─".repeat(name_width + 2 + SCORE_COLUMN.len()));
        out.push('\n');

        for entry in &ranking.entries {
            let score = format!("{:.4}", entry.score);
            out.push_str(&format!(
                "{:<width$}  {}\n",
                entry.name,
                self.colorize(&score, Self::score_color(entry.score)),
                width = name_width
            ));
        }
        out
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME RANKING", 1));
        output.push_str(&format!(
            "Generated: {} | Model: {} | Resumes: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S"),
            report.model_name,
            report.documents.len()
        ));

        output.push_str(&self.format_header("Ranking", 2));
        if report.ranking.entries.is_empty() {
            output.push_str("No resumes could be scored.\n");
        } else {
            output.push_str(&self.format_table(&report.ranking));
        }

        if !report.ranking.failures.is_empty() {
            output.push_str(&self.format_header("⚠️  Not scored", 3));
            for failure in &report.ranking.failures {
                output.push_str(&format!(
                    "  • {} {}\n",
                    failure.name,
                    self.colorize(&format!("({})", failure.message), Color::BrightBlack)
                ));
            }
        }

        output.push('\n');
        output.push_str(
            &ChartLayout::from_entries(&report.ranking.entries)
                .render_console(self.chart_width, self.use_colors),
        );

        if let Some(max_chars) = self.preview_chars {
            output.push_str(&self.format_header("📄 Extracted text", 2));
            for document in report.documents.iter() {
                output.push_str(&self.colorize(&document.name, Color::Cyan));
                output.push('\n');
                if document.is_blank() {
                    output.push_str("  (no text)\n\n");
                } else {
                    output.push_str(document.preview(max_chars));
                    output.push_str("\n\n");
                }
            }
        }

        output.push_str(&self.format_header("📝 Feedback", 2));
        for (name, feedback) in &report.feedback {
            output.push_str(&self.colorize(&format!("Feedback for {}", name), Color::White));
            output.push('\n');
            output.push_str(&feedback.render_text());
            output.push_str("\n\n");
        }

        if !report.notices.is_empty() {
            output.push_str(&self.format_header("⚠️  Notices", 3));
            for notice in &report.notices {
                output.push_str(&format!(
                    "  • {}: {}\n",
                    notice.name,
                    self.colorize(&notice.message, Color::Yellow)
                ));
            }
        }

        match report.logged_rows {
            Some(rows) => output.push_str(&format!("\n🗒️  Logged {} rows to {}\n", rows, report.sink)),
            None => output.push_str(&format!("\n🗒️  Results not logged ({})\n", report.sink)),
        }

        if !report.artifacts.is_empty() {
            output.push_str(&format!("📁 Wrote {} files:\n", report.artifacts.len()));
            for path in &report.artifacts {
                output.push_str(&format!("   {}\n", path.display()));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn format_ranking(&self, document: &RankingDocument<'_>) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(document)?)
        } else {
            Ok(serde_json::to_string(document)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let summary = BatchSummary {
            document: RankingDocument::new(
                &report.model_name,
                &report.generated_at,
                &report.ranking,
                &report.feedback,
            ),
            notices: &report.notices,
            artifacts: &report.artifacts,
            logged_rows: report.logged_rows,
            sink: &report.sink,
        };

        if self.pretty {
            Ok(serde_json::to_string_pretty(&summary)?)
        } else {
            Ok(serde_json::to_string(&summary)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Formatter for the requested output format
pub fn formatter_for(format: OutputFormat, use_colors: bool, preview: Option<usize>) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => {
            let formatter = ConsoleFormatter::new(use_colors);
            match preview {
                Some(max_chars) => Box::new(formatter.with_preview(max_chars)),
                None => Box::new(formatter),
            }
        }
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
