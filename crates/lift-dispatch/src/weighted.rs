//! Multi-factor weighted scoring.
//!
//! Each unit's cost is the sum of seven independently weighted terms:
//!
//! ```text
//! distance  = |unit.floor − origin| × w.distance
//! queue     = queue_len × w.queue
//! busy      = w.busy if mid-service else 0
//! party     = party_size × w.party
//! direction = w.direction if the current leg heads away from origin else 0
//! idle      = max(0, −idle_secs / w.idle_divisor)
//! load      = queued passengers × w.load
//! ```
//!
//! `idle` can never raise a unit's cost: idle time is non-negative, so the
//! clamped term is 0 for every reachable state.  It is kept verbatim so the
//! published breakdown matches the historical heuristic.

use lift_core::{Request, UnitId, WeightedFactorWeights};
use log::debug;

use crate::{Decision, DispatchPolicy, DispatchResult, Explanation, FleetSnapshot, PolicyKind, UnitView};

/// Per-unit factor breakdown.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorBreakdown {
    pub unit:      UnitId,
    pub distance:  f64,
    pub queue:     f64,
    pub busy:      f64,
    pub party:     f64,
    pub direction: f64,
    pub idle:      f64,
    pub load:      f64,
    pub total:     f64,
}

/// Picks the unit with the strictly smallest weighted cost; ties keep the
/// lowest index.
#[derive(Clone, Debug, Default)]
pub struct WeightedFactorPolicy {
    pub weights: WeightedFactorWeights,
}

impl WeightedFactorPolicy {
    pub fn new(weights: WeightedFactorWeights) -> Self {
        Self { weights }
    }

    /// Score one unit against `request`.
    pub fn score(&self, fleet: &FleetSnapshot, unit: &UnitView, request: &Request) -> FactorBreakdown {
        let w = &self.weights;

        let distance = unit.floor.abs_diff(request.origin) as f64 * w.distance;
        let queue = unit.queue_len() as f64 * w.queue;
        let busy = if unit.busy { w.busy } else { 0.0 };
        let party = request.party_size as f64 * w.party;
        let direction = match unit.leg_target() {
            None => 0.0,
            Some(target) => {
                let same_side = (target > unit.floor && request.origin > unit.floor)
                    || (target < unit.floor && request.origin < unit.floor);
                if same_side { 0.0 } else { w.direction }
            }
        };
        let idle = (-fleet.idle_secs(unit) / w.idle_divisor).max(0.0);
        let load = unit.queued_passengers() as f64 * w.load;

        let total = distance + queue + busy + party + direction + idle + load;
        FactorBreakdown { unit: unit.id, distance, queue, busy, party, direction, idle, load, total }
    }
}

impl DispatchPolicy for WeightedFactorPolicy {
    type State = ();

    fn kind(&self) -> PolicyKind {
        PolicyKind::WeightedFactor
    }

    fn choose(
        &self,
        fleet:   &FleetSnapshot,
        request: &Request,
        _state:  &mut (),
    ) -> DispatchResult<Decision> {
        fleet.check(request)?;

        let factors: Vec<FactorBreakdown> =
            fleet.units.iter().map(|u| self.score(fleet, u, request)).collect();

        let mut best = 0;
        let mut best_score = f64::INFINITY;
        for (i, f) in factors.iter().enumerate() {
            if f.total < best_score {
                best_score = f.total;
                best = i;
            }
        }

        let unit = fleet.units[best].id;
        debug!("weighted-factor: request {} → {unit} (score {best_score:.2})", request.id);
        Ok(Decision {
            policy:      PolicyKind::WeightedFactor,
            unit,
            score:       best_score,
            explanation: Explanation::WeightedFactor { factors },
        })
    }
}
