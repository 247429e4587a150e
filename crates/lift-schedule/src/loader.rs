//! CSV traffic loader.
//!
//! # CSV format
//!
//! One row per call.  Rows need not be sorted.
//!
//! ```csv
//! tick,origin,destination,party_size
//! 0,2,8,2
//! 0,9,0,1
//! 40,5,1,4
//! ```
//!
//! Values are read as unsigned integers only.  Range and party-size checks
//! happen at intake, so a script can carry requests that are meant to be
//! rejected.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use lift_core::Tick;

use crate::{ScheduleError, ScheduledCall, TrafficScript};

#[derive(Deserialize)]
struct CallRecord {
    tick:        u64,
    origin:      u32,
    destination: u32,
    party_size:  u32,
}

/// Load a [`TrafficScript`] from a CSV file.
pub fn load_traffic_csv(path: &Path) -> Result<TrafficScript, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_traffic_reader(file)
}

/// Like [`load_traffic_csv`] but accepts any `Read` source.
pub fn load_traffic_reader<R: Read>(reader: R) -> Result<TrafficScript, ScheduleError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut calls = Vec::new();

    for (i, result) in csv_reader.deserialize::<CallRecord>().enumerate() {
        let row = result.map_err(|e| ScheduleError::Parse(format!("row {}: {e}", i + 1)))?;
        calls.push(ScheduledCall {
            tick:        Tick(row.tick),
            origin:      row.origin,
            destination: row.destination,
            party_size:  row.party_size,
        });
    }

    Ok(TrafficScript::new(calls))
}
