//! Rotating (round-robin) baseline.

use lift_core::{Request, UnitId};

use crate::{Decision, DispatchPolicy, DispatchResult, Explanation, FleetSnapshot, PolicyKind};

/// The last unit the rotating policy chose.  `None` before the first call, so
/// the first choice is unit 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotationCursor(pub Option<UnitId>);

impl RotationCursor {
    pub fn reset(&mut self) {
        self.0 = None;
    }
}

/// Cycles through the fleet in index order, ignoring load and position
/// entirely.  A naive baseline for the comparison table.
#[derive(Clone, Copy, Debug, Default)]
pub struct RotatingPolicy;

impl DispatchPolicy for RotatingPolicy {
    type State = RotationCursor;

    fn kind(&self) -> PolicyKind {
        PolicyKind::Rotating
    }

    fn choose(
        &self,
        fleet:   &FleetSnapshot,
        request: &Request,
        cursor:  &mut RotationCursor,
    ) -> DispatchResult<Decision> {
        fleet.check(request)?;

        let previous = cursor.0;
        let next = match previous {
            None       => 0,
            Some(last) => last.next_in(fleet.len()).index(),
        };
        let unit = fleet.units[next].id;
        cursor.0 = Some(unit);

        Ok(Decision {
            policy:      PolicyKind::Rotating,
            unit,
            score:       0.0,
            explanation: Explanation::Rotating { previous },
        })
    }
}
