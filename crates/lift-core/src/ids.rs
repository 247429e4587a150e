//! Identifier newtypes.
//!
//! `UnitId` is the unit's position in the fleet `Vec`; `RequestId` is a
//! per-simulation sequence number handed out at intake.

use std::fmt;

/// Index of a transport unit (elevator car) in the fleet.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The id following `self` in a fleet of `fleet_size` units, wrapping to 0.
    pub fn next_in(self, fleet_size: usize) -> UnitId {
        if fleet_size == 0 {
            return UnitId(0);
        }
        UnitId(((self.index() + 1) % fleet_size) as u32)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {}", self.0)
    }
}

/// Monotonic sequence number assigned to every accepted request.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
