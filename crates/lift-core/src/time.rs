//! Virtual time.
//!
//! Every duration in the simulator (floor step, dwell, idle timeout, release
//! pacing) is a whole number of ticks.  `SimClock` maps ticks to simulated
//! milliseconds:
//!
//!   elapsed_ms = tick * tick_duration_ms
//!
//! Tests step the clock by hand.  The demo binary can sleep
//! `tick_duration_ms` per tick for real-time pacing.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The coordinator's time source.  Only the tick loop advances it, so every
/// unit and policy sees the same `now` within a tick.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many real milliseconds one tick represents.
    pub tick_duration_ms: u32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_ms: u32) -> Self {
        Self { tick_duration_ms, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.current_tick
    }

    /// Elapsed simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current_tick.0 * self.tick_duration_ms as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.elapsed_ms();
        write!(f, "{} ({}.{:03}s)", self.current_tick, ms / 1_000, ms % 1_000)
    }
}
