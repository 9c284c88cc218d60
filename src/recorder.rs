use crate::error::TzResult;
use crate::outcome::AttemptOutcome;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const HEADER: [&str; 7] = [
    "Timestamp",
    "Trial",
    "PointIndex",
    "Price",
    "Success",
    "FailedAttempts",
    "TimeTaken",
];

#[derive(Debug, Serialize)]
struct OutcomeRow {
    timestamp: u64,
    trial: u32,
    point_index: i64,
    price: f32,
    success: bool,
    failed_attempts: u32,
    time_taken: u64,
}

/// Appends one CSV row per outcome. The header is written once per file.
pub struct OutcomeRecorder<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl OutcomeRecorder<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> TzResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;
        Self::from_writer(file, is_empty)
    }
}

impl<W: Write> OutcomeRecorder<W> {
    pub fn from_writer(inner: W, write_header: bool) -> TzResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        if write_header {
            writer.write_record(HEADER)?;
        }
        Ok(Self { writer, rows: 0 })
    }

    pub fn record(&mut self, outcome: &AttemptOutcome) -> TzResult<()> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.writer.serialize(OutcomeRow {
            timestamp,
            trial: outcome.trial,
            point_index: outcome.logged_index(),
            price: outcome.value,
            success: outcome.success,
            failed_attempts: outcome.failed_attempts,
            time_taken: outcome.elapsed_ms,
        })?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> TzResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> TzResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}
