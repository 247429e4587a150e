//! `lift-core` — foundational types for the `rust_lift` dispatch simulator.
//!
//! This crate is a dependency of every other `lift-*` crate.  It has no
//! `lift-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `UnitId`, `RequestId`                                      |
//! | [`time`]        | `Tick`, `SimClock`                                         |
//! | [`config`]      | `BuildingConfig`, `TimingConfig`, weights, `SimConfig`     |
//! | [`request`]     | `Request`, `validate_trip`, travel-time math               |
//! | [`rng`]         | `SimRng` (seeded traffic generation)                       |
//! | [`error`]       | `RequestError`, `LiftError`, `LiftResult`                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod request;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BuildingConfig, ComparisonConfig, SimConfig, TimingConfig, WeightedFactorWeights};
pub use error::{LiftError, LiftResult, RequestError};
pub use ids::{RequestId, UnitId};
pub use request::{Floor, Request, floor_distance, trip_secs, validate_trip};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
