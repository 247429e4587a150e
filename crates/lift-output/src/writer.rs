//! The `OutputWriter` trait implemented by backend writers.

use crate::{CompletionRow, OutputResult, PolicyRow, UnitSnapshotRow};

/// A sink for simulation output.
///
/// Errors are returned here but stored by [`SimOutputObserver`][crate::SimOutputObserver]
/// and retrieved with `take_error` after the run.
pub trait OutputWriter {
    /// Write one row per unit for a snapshot tick.
    fn write_snapshots(&mut self, rows: &[UnitSnapshotRow]) -> OutputResult<()>;

    fn write_completion(&mut self, row: &CompletionRow) -> OutputResult<()>;

    /// Write the final comparison table.
    fn write_comparison(&mut self, rows: &[PolicyRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
