//! `lift-output` — simulation output writers for rust_lift.
//!
//! | Backend | Files created                                                |
//! |---------|--------------------------------------------------------------|
//! | CSV     | `unit_snapshots.csv`, `completions.csv`, `comparison.csv`    |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `lift_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lift_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{CompletionRow, PolicyRow, UnitSnapshotRow};
pub use writer::OutputWriter;
