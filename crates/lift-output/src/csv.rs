//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `unit_snapshots.csv`
//! - `completions.csv`
//! - `comparison.csv` (written once, at the end of the run)

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CompletionRow, OutputResult, PolicyRow, UnitSnapshotRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    snapshots:   Writer<File>,
    completions: Writer<File>,
    comparison:  Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("unit_snapshots.csv"))?;
        snapshots.write_record([
            "tick", "elapsed_ms", "unit_id", "floor", "phase", "busy", "queue_len", "served",
            "avg_wait_secs", "distance_m",
        ])?;

        let mut completions = Writer::from_path(dir.join("completions.csv"))?;
        completions.write_record([
            "request_id", "unit_id", "origin", "destination", "party_size", "created_tick",
            "finished_tick", "travel_secs",
        ])?;

        let mut comparison = Writer::from_path(dir.join("comparison.csv"))?;
        comparison.write_record(["policy", "requests", "total_wait_secs", "avg_wait_secs"])?;

        Ok(Self { snapshots, completions, comparison, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[UnitSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.elapsed_ms.to_string(),
                row.unit_id.to_string(),
                row.floor.to_string(),
                row.phase.clone(),
                (row.busy as u8).to_string(),
                row.queue_len.to_string(),
                row.served.to_string(),
                format!("{:.3}", row.avg_wait_secs),
                format!("{:.1}", row.distance_m),
            ])?;
        }
        Ok(())
    }

    fn write_completion(&mut self, row: &CompletionRow) -> OutputResult<()> {
        self.completions.write_record(&[
            row.request_id.to_string(),
            row.unit_id.to_string(),
            row.origin.to_string(),
            row.destination.to_string(),
            row.party_size.to_string(),
            row.created_tick.to_string(),
            row.finished_tick.to_string(),
            format!("{:.3}", row.travel_secs),
        ])?;
        Ok(())
    }

    fn write_comparison(&mut self, rows: &[PolicyRow]) -> OutputResult<()> {
        for row in rows {
            self.comparison.write_record(&[
                row.policy.to_string(),
                row.requests.to_string(),
                format!("{:.3}", row.total_wait_secs),
                format!("{:.3}", row.avg_wait_secs),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.completions.flush()?;
        self.comparison.flush()?;
        Ok(())
    }
}
