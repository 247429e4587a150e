//! Comparison and system-wide statistics.
//!
//! The weighted-factor row of the comparison table mirrors the system totals
//! and is refreshed on every completion.  The two baseline rows never execute
//! anything; each submission adds a synchronous estimate of what the baseline
//! would have cost:
//!
//! ```text
//! estimate = ( trip(unit.floor → origin → destination)
//!            + Σ trip(unit.floor → q.origin → q.destination) for q in unit.queue )
//!            × real_time_factor × inflation
//! ```
//!
//! The inflation factors come from `ComparisonConfig` and are a modelling
//! choice, not a physical estimate.

use lift_core::{BuildingConfig, Request, trip_secs};
use lift_dispatch::{PolicyKind, UnitView};
use lift_unit::UnitCounters;

// ── Per-policy rows ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyStats {
    pub requests:        u64,
    pub total_wait_secs: f64,
}

impl PolicyStats {
    /// 0 when no request has been counted.
    pub fn avg_wait_secs(&self) -> f64 {
        if self.requests == 0 { 0.0 } else { self.total_wait_secs / self.requests as f64 }
    }

    pub fn record(&mut self, wait_secs: f64) {
        self.requests += 1;
        self.total_wait_secs += wait_secs;
    }
}

/// One row of the published comparison table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonRow {
    pub policy:          PolicyKind,
    pub requests:        u64,
    pub total_wait_secs: f64,
    pub avg_wait_secs:   f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonStats {
    pub weighted_factor: PolicyStats,
    pub shortest_queue:  PolicyStats,
    pub rotating:        PolicyStats,
}

impl ComparisonStats {
    pub fn get(&self, policy: PolicyKind) -> &PolicyStats {
        match policy {
            PolicyKind::WeightedFactor => &self.weighted_factor,
            PolicyKind::ShortestQueue  => &self.shortest_queue,
            PolicyKind::Rotating       => &self.rotating,
        }
    }

    /// Rows in `PolicyKind::ALL` order.
    pub fn rows(&self) -> Vec<ComparisonRow> {
        PolicyKind::ALL
            .iter()
            .map(|&policy| {
                let s = self.get(policy);
                ComparisonRow {
                    policy,
                    requests:        s.requests,
                    total_wait_secs: s.total_wait_secs,
                    avg_wait_secs:   s.avg_wait_secs(),
                }
            })
            .collect()
    }

    /// Mirror the fleet totals into the weighted-factor row.
    pub fn sync_weighted(&mut self, system: &SystemStats) {
        self.weighted_factor = PolicyStats {
            requests:        system.served,
            total_wait_secs: system.total_wait_secs,
        };
    }
}

/// What a load-blind baseline would have cost for `request` on `unit`, in
/// scaled seconds.
pub fn baseline_estimate(unit: &UnitView, request: &Request, building: &BuildingConfig, inflation: f64) -> f64 {
    let own = trip_secs(unit.floor, request.origin, request.destination, building);
    let queued: f64 = unit
        .queue
        .iter()
        .map(|q| trip_secs(unit.floor, q.origin, q.destination, building))
        .sum();
    (own + queued) * building.real_time_factor * inflation
}

// ── System totals ─────────────────────────────────────────────────────────────

/// Totals across the whole fleet.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemStats {
    pub served:           u64,
    pub total_wait_secs:  f64,
    pub total_distance_m: f64,
    pub total_passengers: u64,
}

impl SystemStats {
    pub fn aggregate<'a>(counters: impl IntoIterator<Item = &'a UnitCounters>) -> Self {
        counters.into_iter().fold(SystemStats::default(), |mut acc, c| {
            acc.served += c.served;
            acc.total_wait_secs += c.total_wait_secs;
            acc.total_distance_m += c.total_distance_m;
            acc.total_passengers += c.total_passengers;
            acc
        })
    }

    pub fn avg_wait_secs(&self) -> f64 {
        if self.served == 0 { 0.0 } else { self.total_wait_secs / self.served as f64 }
    }
}
