//! `lift-sim` — fleet coordinator and tick loop for the rust_lift simulator.
//!
//! # Tick loop
//!
//! ```text
//! for tick in now..config.total_ticks:
//!   ① Wake     — drain events scheduled for this tick from WakeQueue:
//!                  Unit(u)        → Unit::on_wake; schedule its next wake
//!                  Release(r)     → dispatch a held request (paced)
//!                  IdleSweep      → send long-idle units back to standby
//!   ② Traffic  — TrafficSource::calls_at(tick) → submit each call
//!   ③ Report   — requests dropped by recovered pipeline faults
//! ```
//!
//! # Dispatch
//!
//! ```text
//! submit(o, d, p) ─▶ validate ─▶ hold? ─yes─▶ HoldBuffer
//!                                   │no
//!                                   ▼
//!                  snapshot ─▶ weighted-factor ─▶ enqueue on chosen unit
//!                           ├▶ shortest-queue  ─▶ comparison estimate
//!                           └▶ rotating        ─▶ comparison estimate
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Evaluates the three policies on Rayon's thread pool.    |
//! | `serde`    | `Serialize`/`Deserialize` on `SimView` and its parts.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lift_core::SimConfig;
//! use lift_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default()).build()?;
//! sim.submit(2, 8, 2)?;
//! sim.run_ticks(100, &mut NoopObserver);
//! println!("{:?}", sim.view().system);
//! ```

pub mod builder;
pub mod error;
pub mod hold;
pub mod observer;
pub mod sim;
pub mod stats;
pub mod view;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use hold::HoldBuffer;
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, Submission};
pub use stats::{ComparisonRow, ComparisonStats, PolicyStats, SystemStats, baseline_estimate};
pub use view::{DispatchRecord, SimView, UnitStatus};
