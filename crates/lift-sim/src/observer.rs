//! Simulation observer trait for progress reporting and data collection.

use lift_core::{Request, Tick, UnitId};
use lift_schedule::ScheduledCall;
use lift_unit::Completion;

use crate::{DispatchRecord, SimError, SimView};

/// Callbacks invoked by [`Sim::step`][crate::Sim::step] and
/// [`Sim::run`][crate::Sim::run] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// Only activity that happens inside a tick is reported: scripted traffic,
/// paced releases, and unit transitions.  A direct [`Sim::submit`][crate::Sim::submit]
/// returns its outcome to the caller instead.  Requests dropped by a pipeline
/// fault are always reported, at the end of the next tick.
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `handled` counts the wake events and
    /// traffic calls processed this tick.
    fn on_tick_end(&mut self, _tick: Tick, _handled: usize) {}

    fn on_dispatch(&mut self, _record: &DispatchRecord) {}

    /// A request was buffered because hold mode is on.
    fn on_held(&mut self, _tick: Tick, _request: &Request, _pending: usize) {}

    /// A scripted call failed validation.
    fn on_rejected(&mut self, _tick: Tick, _call: &ScheduledCall, _error: &SimError) {}

    fn on_completion(&mut self, _completion: &Completion) {}

    /// A request was dropped while recovering `unit` from a pipeline fault.
    fn on_dropped(&mut self, _tick: Tick, _unit: UnitId, _request: &Request) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`).
    fn on_snapshot(&mut self, _tick: Tick, _view: &SimView) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _view: &SimView) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
