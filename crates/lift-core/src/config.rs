//! Simulation configuration.
//!
//! Everything here is injected once at build time and is immutable for the
//! lifetime of a simulation.  Defaults describe a 10-floor building with three
//! cars.  Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to the simulation builder.

use crate::{LiftError, LiftResult};

// ── BuildingConfig ────────────────────────────────────────────────────────────

/// Physical description of the building and its cars.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildingConfig {
    /// Number of floors; valid floor numbers are `0..floors`.
    pub floors: u32,
    /// Number of units in the fleet.
    pub units: usize,
    /// Largest party a single request may carry.
    pub max_capacity: u32,
    /// Car speed in metres per second.
    pub speed_mps: f64,
    /// Height of one floor in metres.
    pub floor_height_m: f64,
    /// Door open + boarding + door close, in seconds.
    pub door_time_secs: f64,
    /// Scale from simulated travel estimate to reported "real" seconds.
    pub real_time_factor: f64,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            floors:           10,
            units:            3,
            max_capacity:     8,
            speed_mps:        1.5,
            floor_height_m:   3.0,
            door_time_secs:   3.0,
            real_time_factor: 5.0,
        }
    }
}

impl BuildingConfig {
    /// Standby floor for unit `index`, evenly spaced from the bottom to the
    /// top floor (bottom / middle / top for three units).
    pub fn standby_floor(&self, index: usize) -> u32 {
        if self.units <= 1 || self.floors <= 1 {
            return 0;
        }
        let top = (self.floors - 1) as f64;
        let spacing = top / (self.units - 1) as f64;
        ((index as f64 * spacing).round() as u32).min(self.floors - 1)
    }

    /// All standby floors, indexed by unit.
    pub fn standby_floors(&self) -> Vec<u32> {
        (0..self.units).map(|i| self.standby_floor(i)).collect()
    }
}

// ── TimingConfig ──────────────────────────────────────────────────────────────

/// Tick durations that pace the unit state machine and the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Real milliseconds per tick.  Default: 100.
    pub tick_duration_ms: u32,
    /// Ticks to travel one floor.
    pub floor_step_ticks: u64,
    /// Ticks spent with doors open at each pickup and dropoff.
    pub dwell_ticks: u64,
    /// An idle unit is sent to its standby floor once idle longer than this.
    pub idle_timeout_ticks: u64,
    /// Interval between idle-return sweeps.
    pub idle_sweep_interval_ticks: u64,
    /// Spacing between requests replayed from the hold buffer.
    pub release_pacing_ticks: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms:          100,
            floor_step_ticks:          6,
            dwell_ticks:               9,
            idle_timeout_ticks:        100,
            idle_sweep_interval_ticks: 50,
            release_pacing_ticks:      18,
        }
    }
}

// ── WeightedFactorWeights ─────────────────────────────────────────────────────

/// Weights of the multi-factor scoring policy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeightedFactorWeights {
    /// Per floor between the unit and the request origin.
    pub distance: f64,
    /// Per request already queued on the unit.
    pub queue: f64,
    /// Flat penalty while the unit is mid-service.
    pub busy: f64,
    /// Per passenger in the new request.
    pub party: f64,
    /// Flat penalty when the unit's current leg heads the other way.
    pub direction: f64,
    /// Divisor applied to idle seconds in the idle term.
    pub idle_divisor: f64,
    /// Per passenger already queued on the unit.
    pub load: f64,
}

impl Default for WeightedFactorWeights {
    fn default() -> Self {
        Self {
            distance:     1.5,
            queue:        3.0,
            busy:         15.0,
            party:        2.0,
            direction:    8.0,
            idle_divisor: 10.0,
            load:         1.5,
        }
    }
}

// ── ComparisonConfig ──────────────────────────────────────────────────────────

/// Inflation factors applied to the baseline policies' wait estimates.
///
/// These are modelling constants for the side-by-side comparison, not
/// validated physical estimates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComparisonConfig {
    pub shortest_queue_inflation: f64,
    pub rotating_inflation:       f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self { shortest_queue_inflation: 3.0, rotating_inflation: 2.0 }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    pub building:   BuildingConfig,
    pub timing:     TimingConfig,
    pub weights:    WeightedFactorWeights,
    pub comparison: ComparisonConfig,

    /// Total ticks `Sim::run` simulates.  0 means `run` returns immediately.
    pub total_ticks: u64,

    /// Master RNG seed for generated traffic.
    pub seed: u64,

    /// Emit a snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> LiftResult<()> {
        let b = &self.building;
        if b.floors < 2 {
            return Err(LiftError::Config(format!(
                "building needs at least 2 floors, got {}", b.floors
            )));
        }
        if b.units == 0 {
            return Err(LiftError::Config("fleet needs at least one unit".into()));
        }
        if b.max_capacity == 0 {
            return Err(LiftError::Config("max_capacity must be at least 1".into()));
        }
        if !(b.speed_mps > 0.0) || !(b.floor_height_m > 0.0) {
            return Err(LiftError::Config(
                "speed_mps and floor_height_m must be positive".into(),
            ));
        }
        if b.door_time_secs < 0.0 || b.real_time_factor < 0.0 {
            return Err(LiftError::Config(
                "door_time_secs and real_time_factor must not be negative".into(),
            ));
        }

        let t = &self.timing;
        let zero_timing = [
            ("tick_duration_ms", t.tick_duration_ms as u64),
            ("floor_step_ticks", t.floor_step_ticks),
            ("dwell_ticks", t.dwell_ticks),
            ("idle_sweep_interval_ticks", t.idle_sweep_interval_ticks),
            ("release_pacing_ticks", t.release_pacing_ticks),
        ];
        if let Some((name, _)) = zero_timing.iter().find(|(_, v)| *v == 0) {
            return Err(LiftError::Config(format!("{name} must be at least 1")));
        }

        if !(self.weights.idle_divisor > 0.0) {
            return Err(LiftError::Config("idle_divisor must be positive".into()));
        }
        Ok(())
    }
}
