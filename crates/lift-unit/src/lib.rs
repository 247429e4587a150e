//! `lift-unit` — the per-unit execution pipeline.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`phase`]   | `UnitPhase`, `Leg`, `Stop` — the state machine's states      |
//! | [`unit`]    | `Unit`, `UnitCounters`, `PipelineConfig`, `Step`, `Completion` |
//! | [`error`]   | `UnitError`, `UnitResult<T>`                                 |
//!
//! # Pipeline
//!
//! ```text
//! Idle ─▶ Moving(ToPickup) ─▶ Dwelling(Pickup) ─▶ Moving(ToDropoff) ─▶ Dwelling(Dropoff) ─▶ Idle
//!   └──▶ Moving(ToStandby) ─────────────────────────────────────────────────────────────▶ Idle
//! ```
//!
//! A unit never sleeps on its own.  Every transition returns the tick at which
//! the unit next needs attention; the caller schedules that tick in its wake
//! queue and calls [`Unit::on_wake`] when it comes due.  Each unit has at most
//! one outstanding wake, and a wake for any other tick is ignored, so two
//! pipelines can never run on the same unit.

pub mod error;
pub mod phase;
pub mod unit;

#[cfg(test)]
mod tests;

pub use error::{UnitError, UnitResult};
pub use phase::{Leg, Stop, UnitPhase};
pub use unit::{Completion, PipelineConfig, QueuedRequest, Recovery, Step, Unit, UnitCounters, UnitEvent};
