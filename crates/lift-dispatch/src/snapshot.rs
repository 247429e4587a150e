//! Read-only fleet state handed to every policy.

use lift_core::{BuildingConfig, Floor, Request, Tick, UnitId};

use crate::{DispatchError, DispatchResult};

/// One unit as seen by the policies at snapshot time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitView {
    pub id:            UnitId,
    pub floor:         Floor,
    pub busy:          bool,
    /// Queued requests in service order; the head is the one in flight when
    /// `busy`.
    pub queue:         Vec<Request>,
    pub last_activity: Tick,
}

impl UnitView {
    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Passengers across every queued request.
    pub fn queued_passengers(&self) -> u32 {
        self.queue.iter().map(|r| r.party_size).sum()
    }

    /// Floor the unit's current leg heads for, judged by the head request's
    /// origin.  `None` when nothing is queued.
    #[inline]
    pub fn leg_target(&self) -> Option<Floor> {
        self.queue.first().map(|r| r.origin)
    }
}

/// A consistent, owned copy of the fleet at a single tick.
///
/// Built once per submission by the coordinator and shared immutably by all
/// policies, so the side-by-side comparison is fair.
#[derive(Clone, Debug)]
pub struct FleetSnapshot {
    /// Tick at which the snapshot was taken.
    pub now:              Tick,
    /// Real milliseconds per tick, for converting idle time into seconds.
    pub tick_duration_ms: u32,
    pub building:         BuildingConfig,
    pub units:            Vec<UnitView>,
}

impl FleetSnapshot {
    pub fn new(now: Tick, tick_duration_ms: u32, building: BuildingConfig, units: Vec<UnitView>) -> Self {
        Self { now, tick_duration_ms, building, units }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Bounds-checked access to a unit view.
    pub fn unit(&self, id: UnitId) -> DispatchResult<&UnitView> {
        self.units
            .get(id.index())
            .ok_or(DispatchError::UnitOutOfRange { index: id.index(), len: self.units.len() })
    }

    /// Signed seconds from `unit.last_activity` to `now`.
    pub fn idle_secs(&self, unit: &UnitView) -> f64 {
        let ticks = self.now.0 as f64 - unit.last_activity.0 as f64;
        ticks * self.tick_duration_ms as f64 / 1_000.0
    }

    /// Shared precondition of every policy: a non-empty fleet and a request
    /// that satisfies the building limits.
    pub fn check(&self, request: &Request) -> DispatchResult<()> {
        if self.units.is_empty() {
            return Err(DispatchError::EmptyFleet);
        }
        request.validate(&self.building)?;
        Ok(())
    }
}
