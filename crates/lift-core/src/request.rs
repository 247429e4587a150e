//! Pickup/drop-off requests and the travel-time estimate shared by all
//! statistics.

use crate::{BuildingConfig, RequestError, RequestId, Tick};

/// A floor number, `0..floors`.
pub type Floor = u32;

/// An immutable pickup/drop-off request.
///
/// Created on submission, owned by whichever queue currently holds it, and
/// dropped after its completion has been accounted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request {
    pub id:          RequestId,
    pub origin:      Floor,
    pub destination: Floor,
    pub party_size:  u32,
    /// Tick at which the request entered the system (intake, not dispatch).
    pub created:     Tick,
}

impl Request {
    pub fn new(id: RequestId, origin: Floor, destination: Floor, party_size: u32, created: Tick) -> Self {
        Self { id, origin, destination, party_size, created }
    }

    /// Re-check this request against `building`.
    pub fn validate(&self, building: &BuildingConfig) -> Result<(), RequestError> {
        validate_trip(self.origin, self.destination, self.party_size, building)
    }
}

/// Check floor range, distinct endpoints, and party size, in that order.
pub fn validate_trip(
    origin:      Floor,
    destination: Floor,
    party_size:  u32,
    building:    &BuildingConfig,
) -> Result<(), RequestError> {
    let top = building.floors.saturating_sub(1);
    for floor in [origin, destination] {
        if floor > top {
            return Err(RequestError::FloorOutOfRange { floor, top });
        }
    }
    if origin == destination {
        return Err(RequestError::SameFloor { floor: origin });
    }
    if party_size < 1 || party_size > building.max_capacity {
        return Err(RequestError::PartySize { got: party_size, max: building.max_capacity });
    }
    Ok(())
}

#[inline]
pub fn floor_distance(a: Floor, b: Floor) -> u32 {
    a.abs_diff(b)
}

/// Estimated seconds to serve a trip for a car starting at `from`:
/// travel `from → origin → destination` plus two door dwells.
///
/// Not scaled by `real_time_factor`; callers apply the factor they report in.
pub fn trip_secs(from: Floor, origin: Floor, destination: Floor, building: &BuildingConfig) -> f64 {
    let floors = floor_distance(from, origin) + floor_distance(origin, destination);
    floors as f64 * building.floor_height_m / building.speed_mps + 2.0 * building.door_time_secs
}
