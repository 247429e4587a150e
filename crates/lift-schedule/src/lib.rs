//! `lift-schedule` — virtual timer and request traffic for the dispatch loop.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`wake_queue`] | `WakeQueue<E>` (`BTreeMap<Tick, Vec<E>>`)                   |
//! | [`traffic`]    | `ScheduledCall`, `TrafficSource` trait, `TrafficScript`, `RandomTraffic`, `NoTraffic`, `ChainedTraffic` |
//! | [`loader`]     | `load_traffic_csv`, `load_traffic_reader`                  |
//! | [`error`]      | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Timing model (summary)
//!
//! Nothing in the simulator sleeps.  Every delayed action (a floor step, a
//! door dwell, a paced release, the idle sweep) is an event pushed into the
//! `WakeQueue` at the tick it becomes due.  Each tick the simulation drains
//! only the events scheduled for that tick, then asks its `TrafficSource`
//! for the calls that arrive at that tick.

pub mod error;
pub mod loader;
pub mod traffic;
pub mod wake_queue;


pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_traffic_csv, load_traffic_reader};
pub use traffic::{ChainedTraffic, NoTraffic, RandomTraffic, ScheduledCall, TrafficScript, TrafficSource, TrafficSourceExt};
pub use wake_queue::WakeQueue;
