//! Local CSV result log

use super::{LogRow, ResultSink};
use crate::error::Result;
use csv::WriterBuilder;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

pub const CSV_HEADER: [&str; 3] = ["name", "score", "timestamp"];

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn append_blocking(&self, rows: &[LogRow]) -> Result<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file_exists = self.path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if !file_exists {
            writer.write_record(CSV_HEADER)?;
        }
        for row in rows {
            writer.serialize((&row.name, row.score, &row.timestamp))?;
        }
        writer.flush()?;

        Ok(rows.len())
    }
}

impl ResultSink for CsvSink {
    async fn append_rows(&self, rows: &[LogRow]) -> Result<usize> {
        self.append_blocking(rows)
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}
