//! Append-only result logging

pub mod csv_file;
pub mod sheets;

use crate::config::{Config, SinkKind};
use crate::error::Result;
use crate::processing::ranker::RankingEntry;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::future::Future;

pub use csv_file::CsvSink;
pub use sheets::GoogleSheetsSink;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One appended record: candidate, score, time of the batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRow {
    pub name: String,
    pub score: f64,
    pub timestamp: String,
}

impl LogRow {
    pub fn new(name: impl Into<String>, score: f32, at: &DateTime<Local>) -> Self {
        Self {
            name: name.into(),
            score: round_score(score),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Rows in ranked order, all stamped with the same time
    pub fn from_entries(entries: &[RankingEntry], at: &DateTime<Local>) -> Vec<LogRow> {
        entries
            .iter()
            .map(|entry| LogRow::new(entry.name.clone(), entry.score, at))
            .collect()
    }
}

/// Four decimal places
pub fn round_score(score: f32) -> f64 {
    (score as f64 * 10_000.0).round() / 10_000.0
}

pub trait ResultSink {
    /// Append `rows` and report how many were written
    fn append_rows(&self, rows: &[LogRow]) -> impl Future<Output = Result<usize>> + Send;

    fn describe(&self) -> String;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Accepts rows and discards them
#[derive(Debug, Default, Clone)]
pub struct DisabledSink;

impl ResultSink for DisabledSink {
    async fn append_rows(&self, _rows: &[LogRow]) -> Result<usize> {
        Ok(0)
    }

    fn describe(&self) -> String {
        "disabled".to_string()
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// The sink selected by `[logging]` in the configuration file
pub enum ConfiguredSink {
    GoogleSheets(GoogleSheetsSink),
    Csv(CsvSink),
    Disabled(DisabledSink),
}

impl ConfiguredSink {
    pub fn from_config(config: &Config) -> Result<Self> {
        let sink = match config.logging.sink {
            SinkKind::GoogleSheets => ConfiguredSink::GoogleSheets(GoogleSheetsSink::new(
                config.credentials_path(),
                config.logging.spreadsheet_name.clone(),
                config.logging.spreadsheet_id.clone(),
            )?),
            SinkKind::Csv => ConfiguredSink::Csv(CsvSink::new(config.logging.csv_path.clone())),
            SinkKind::Disabled => ConfiguredSink::Disabled(DisabledSink),
        };
        Ok(sink)
    }

    pub fn disabled() -> Self {
        ConfiguredSink::Disabled(DisabledSink)
    }
}

impl ResultSink for ConfiguredSink {
    async fn append_rows(&self, rows: &[LogRow]) -> Result<usize> {
        match self {
            ConfiguredSink::GoogleSheets(sink) => sink.append_rows(rows).await,
            ConfiguredSink::Csv(sink) => sink.append_rows(rows).await,
            ConfiguredSink::Disabled(sink) => sink.append_rows(rows).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfiguredSink::GoogleSheets(sink) => sink.describe(),
            ConfiguredSink::Csv(sink) => sink.describe(),
            ConfiguredSink::Disabled(sink) => sink.describe(),
        }
    }

    fn is_enabled(&self) -> bool {
        !matches!(self, ConfiguredSink::Disabled(_))
    }
}
