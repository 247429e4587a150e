//! Read-only state published to collaborators (display, output writers).

use lift_core::{Floor, Request, Tick, UnitId};
use lift_dispatch::Decision;
use lift_unit::{Unit, UnitPhase};

use crate::{ComparisonRow, SystemStats};

/// One unit as shown to the outside world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStatus {
    pub id:            UnitId,
    pub floor:         Floor,
    pub standby_floor: Floor,
    pub phase:         UnitPhase,
    pub queue_len:     usize,
    pub busy:          bool,
    pub served:        u64,
    pub avg_wait_secs: f64,
    /// Winning score of the unit's latest assignment; 0 after completion.
    pub current_score: f64,
    pub distance_m:    f64,
    pub passengers:    u64,
}

impl From<&Unit> for UnitStatus {
    fn from(unit: &Unit) -> Self {
        let c = unit.counters();
        Self {
            id:            unit.id(),
            floor:         unit.floor(),
            standby_floor: unit.standby_floor(),
            phase:         unit.phase(),
            queue_len:     unit.queue_len(),
            busy:          unit.is_busy(),
            served:        c.served,
            avg_wait_secs: c.avg_wait_secs(),
            current_score: unit.current_score(),
            distance_m:    c.total_distance_m,
            passengers:    c.total_passengers,
        }
    }
}

/// Everything decided for one dispatched request.  Only `weighted` was
/// executed; the baselines are kept for comparison.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchRecord {
    pub at:                           Tick,
    pub request:                      Request,
    pub weighted:                     Decision,
    pub shortest_queue:               Decision,
    pub rotating:                     Decision,
    pub shortest_queue_estimate_secs: f64,
    pub rotating_estimate_secs:       f64,
}

impl DispatchRecord {
    pub fn reason(&self) -> String {
        self.weighted.reason()
    }
}

/// A consistent snapshot of the coordinator at one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimView {
    pub now:              Tick,
    pub units:            Vec<UnitStatus>,
    pub last_dispatch:    Option<DispatchRecord>,
    pub comparison:       Vec<ComparisonRow>,
    pub pending:          usize,
    pub hold:             bool,
    pub system:           SystemStats,
    /// Requests dropped by recovered pipeline faults.
    pub dropped_requests: u64,
}
