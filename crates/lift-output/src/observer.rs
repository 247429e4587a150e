//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use lift_core::{SimConfig, Tick};
use lift_sim::{SimObserver, SimView};
use lift_unit::Completion;

use crate::row::{CompletionRow, PolicyRow, UnitSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes unit snapshots, completions, and the final
/// comparison table to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:           W,
    tick_duration_ms: u32,
    completions:      u64,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_duration_ms: config.timing.tick_duration_ms,
            completions:      0,
            last_error:       None,
        }
    }

    /// Take the stored write error (if any).  `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Completion rows written so far.
    pub fn completions(&self) -> u64 {
        self.completions
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_completion(&mut self, c: &Completion) {
        let row = CompletionRow {
            request_id:    c.request.id.0,
            unit_id:       c.unit.0,
            origin:        c.request.origin,
            destination:   c.request.destination,
            party_size:    c.request.party_size,
            created_tick:  c.request.created.0,
            finished_tick: c.finished.0,
            travel_secs:   c.travel_secs,
        };
        let result = self.writer.write_completion(&row);
        self.completions += 1;
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, view: &SimView) {
        let elapsed_ms = tick.0 * self.tick_duration_ms as u64;
        let rows: Vec<UnitSnapshotRow> = view
            .units
            .iter()
            .map(|u| UnitSnapshotRow {
                tick: tick.0,
                elapsed_ms,
                unit_id:       u.id.0,
                floor:         u.floor,
                phase:         u.phase.to_string(),
                busy:          u.busy,
                queue_len:     u.queue_len as u32,
                served:        u.served,
                avg_wait_secs: u.avg_wait_secs,
                distance_m:    u.distance_m,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, view: &SimView) {
        let rows: Vec<PolicyRow> = view
            .comparison
            .iter()
            .map(|r| PolicyRow {
                policy:          r.policy.name(),
                requests:        r.requests,
                total_wait_secs: r.total_wait_secs,
                avg_wait_secs:   r.avg_wait_secs,
            })
            .collect();
        let result = self.writer.write_comparison(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
