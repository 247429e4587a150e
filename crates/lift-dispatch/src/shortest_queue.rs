//! Shortest-queue baseline.

use lift_core::Request;

use crate::{Decision, DispatchPolicy, DispatchResult, Explanation, FleetSnapshot, PolicyKind};

/// Picks the unit with the fewest queued requests; ties keep the lowest index.
///
/// The score is the chosen queue length, a relative cost rather than seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortestQueuePolicy;

impl DispatchPolicy for ShortestQueuePolicy {
    type State = ();

    fn kind(&self) -> PolicyKind {
        PolicyKind::ShortestQueue
    }

    fn choose(
        &self,
        fleet:   &FleetSnapshot,
        request: &Request,
        _state:  &mut (),
    ) -> DispatchResult<Decision> {
        fleet.check(request)?;

        let queue_lengths: Vec<usize> = fleet.units.iter().map(|u| u.queue_len()).collect();
        let mut best = 0;
        for (i, &len) in queue_lengths.iter().enumerate() {
            if len < queue_lengths[best] {
                best = i;
            }
        }

        Ok(Decision {
            policy:      PolicyKind::ShortestQueue,
            unit:        fleet.units[best].id,
            score:       queue_lengths[best] as f64,
            explanation: Explanation::ShortestQueue { queue_lengths },
        })
    }
}
