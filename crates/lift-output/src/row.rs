//! Plain data row types written by output backends.

/// One unit's state at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSnapshotRow {
    pub tick:          u64,
    pub elapsed_ms:    u64,
    pub unit_id:       u32,
    pub floor:         u32,
    /// Human-readable phase, e.g. `to pickup @3`.
    pub phase:         String,
    pub busy:          bool,
    pub queue_len:     u32,
    pub served:        u64,
    pub avg_wait_secs: f64,
    pub distance_m:    f64,
}

/// One finished request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionRow {
    pub request_id:    u64,
    pub unit_id:       u32,
    pub origin:        u32,
    pub destination:   u32,
    pub party_size:    u32,
    pub created_tick:  u64,
    pub finished_tick: u64,
    /// Recorded travel-time estimate, scaled seconds.
    pub travel_secs:   f64,
}

/// One row of the policy comparison table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyRow {
    pub policy:          &'static str,
    pub requests:        u64,
    pub total_wait_secs: f64,
    pub avg_wait_secs:   f64,
}
