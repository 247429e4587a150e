//! The `DispatchPolicy` trait and the decision it produces.

use std::fmt;

use lift_core::{Request, UnitId};

use crate::{DispatchResult, FactorBreakdown, FleetSnapshot};

/// Which policy produced a decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolicyKind {
    WeightedFactor,
    ShortestQueue,
    Rotating,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] =
        [PolicyKind::WeightedFactor, PolicyKind::ShortestQueue, PolicyKind::Rotating];

    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::WeightedFactor => "weighted-factor",
            PolicyKind::ShortestQueue  => "shortest-queue",
            PolicyKind::Rotating       => "rotating",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policy-specific detail behind a decision, for observability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Explanation {
    /// Full factor breakdown for every unit, in fleet order.
    WeightedFactor { factors: Vec<FactorBreakdown> },
    /// Queue length of every unit, in fleet order.
    ShortestQueue { queue_lengths: Vec<usize> },
    /// The cursor value the choice was derived from.
    Rotating { previous: Option<UnitId> },
}

/// The outcome of one policy evaluation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub policy:      PolicyKind,
    pub unit:        UnitId,
    /// The chosen unit's cost as the policy measures it (lower is better).
    pub score:       f64,
    pub explanation: Explanation,
}

impl Decision {
    /// One-line human-readable reason for the choice.
    pub fn reason(&self) -> String {
        match &self.explanation {
            Explanation::WeightedFactor { .. } => format!(
                "{} has the lowest weighted score: {:.2}",
                self.unit, self.score
            ),
            Explanation::ShortestQueue { .. } => format!(
                "{} has the shortest queue: {} requests",
                self.unit, self.score as usize
            ),
            Explanation::Rotating { .. } => {
                format!("{} is next in rotation", self.unit)
            }
        }
    }
}

/// Pluggable request-assignment policy.
///
/// Implementations must not hold mutable state: anything carried between
/// calls lives in `State`, owned by the caller.  The snapshot is read-only, so
/// a policy can never change the fleet it is scoring.
///
/// # Errors
///
/// - [`DispatchError::EmptyFleet`][crate::DispatchError::EmptyFleet] when the
///   snapshot has no units.
/// - [`DispatchError::InvalidRequest`][crate::DispatchError::InvalidRequest]
///   when the request violates the building limits.  Callers validate first;
///   this is a second line of defence, not the user-facing check.
pub trait DispatchPolicy: Send + Sync {
    /// Carry-state persisted by the caller between calls.
    type State: Default + Send;

    fn kind(&self) -> PolicyKind;

    fn choose(
        &self,
        fleet:   &FleetSnapshot,
        request: &Request,
        state:   &mut Self::State,
    ) -> DispatchResult<Decision>;
}
