//! States of the unit execution state machine.

use std::fmt;

use lift_core::Floor;

/// Purpose of a movement leg.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Leg {
    ToPickup,
    ToDropoff,
    ToStandby,
}

/// Why the doors are open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stop {
    Pickup,
    Dropoff,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitPhase {
    #[default]
    Idle,
    /// Travelling floor by floor toward `target`.
    Moving { leg: Leg, target: Floor },
    /// Stationary with doors open.
    Dwelling { stop: Stop },
}

impl UnitPhase {
    #[inline]
    pub fn is_idle(self) -> bool {
        matches!(self, UnitPhase::Idle)
    }

    /// `true` while the phase belongs to a request's pipeline (as opposed to
    /// idling or repositioning to standby).
    pub fn is_serving(self) -> bool {
        match self {
            UnitPhase::Idle => false,
            UnitPhase::Moving { leg, .. } => leg != Leg::ToStandby,
            UnitPhase::Dwelling { .. } => true,
        }
    }
}

impl fmt::Display for UnitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitPhase::Idle => f.write_str("idle"),
            UnitPhase::Moving { leg: Leg::ToPickup, target } => write!(f, "to pickup @{target}"),
            UnitPhase::Moving { leg: Leg::ToDropoff, target } => write!(f, "to dropoff @{target}"),
            UnitPhase::Moving { leg: Leg::ToStandby, target } => write!(f, "to standby @{target}"),
            UnitPhase::Dwelling { stop: Stop::Pickup } => f.write_str("boarding"),
            UnitPhase::Dwelling { stop: Stop::Dropoff } => f.write_str("alighting"),
        }
    }
}
