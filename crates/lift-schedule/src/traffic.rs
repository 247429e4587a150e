//! Request traffic fed into the intake path each tick.
//!
//! A [`TrafficSource`] is asked once per tick for the calls that arrive at that
//! tick.  Sources compose with [`TrafficSourceExt::and`], so a scripted
//! morning rush can be layered over a random background rate.
//!
//! Calls are raw tuples.  They are validated by the intake path, not here, so
//! a script may deliberately contain bad requests to exercise rejection.

use lift_core::{BuildingConfig, Floor, SimRng, Tick};

use crate::{ScheduleError, ScheduleResult};

// ── ScheduledCall ─────────────────────────────────────────────────────────────

/// One request arriving at `tick`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledCall {
    pub tick:        Tick,
    pub origin:      Floor,
    pub destination: Floor,
    pub party_size:  u32,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Produces the calls arriving at each tick.
///
/// # Contract
///
/// - Called exactly once per tick, with strictly increasing `now`.
/// - Appends to `out`; never clears it.
/// - Must not block or perform I/O.
pub trait TrafficSource: Send {
    fn calls_at(&mut self, now: Tick, out: &mut Vec<ScheduledCall>);

    /// `true` once the source will never produce another call.
    fn is_exhausted(&self) -> bool {
        false
    }
}

// ── No traffic ────────────────────────────────────────────────────────────────

/// A source that never produces a call.  Requests arrive only through direct
/// `submit` calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTraffic;

impl TrafficSource for NoTraffic {
    #[inline]
    fn calls_at(&mut self, _now: Tick, _out: &mut Vec<ScheduledCall>) {}

    fn is_exhausted(&self) -> bool {
        true
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

/// A fixed, time-ordered list of calls.
#[derive(Clone, Debug, Default)]
pub struct TrafficScript {
    calls:  Vec<ScheduledCall>,
    cursor: usize,
}

impl TrafficScript {
    /// Build a script.  Calls are stably sorted by tick, so calls sharing a
    /// tick keep their given order.
    pub fn new(mut calls: Vec<ScheduledCall>) -> Self {
        calls.sort_by_key(|c| c.tick);
        Self { calls, cursor: 0 }
    }

    pub fn calls(&self) -> &[ScheduledCall] {
        &self.calls
    }

    /// Number of calls not yet delivered.
    pub fn remaining(&self) -> usize {
        self.calls.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl TrafficSource for TrafficScript {
    /// Delivers every undelivered call with `tick <= now`; calls whose tick
    /// was skipped over are delivered late rather than lost.
    fn calls_at(&mut self, now: Tick, out: &mut Vec<ScheduledCall>) {
        while let Some(call) = self.calls.get(self.cursor) {
            if call.tick > now {
                break;
            }
            out.push(*call);
            self.cursor += 1;
        }
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.calls.len()
    }
}

// ── Random ────────────────────────────────────────────────────────────────────

/// Seeded Bernoulli arrivals: at most one call per tick, with probability
/// `rate_per_tick`.  Every generated call is valid for `building`.
pub struct RandomTraffic {
    rate_per_tick: f64,
    building:      BuildingConfig,
    rng:           SimRng,
}

impl RandomTraffic {
    pub fn new(rate_per_tick: f64, building: BuildingConfig, rng: SimRng) -> ScheduleResult<Self> {
        if !(0.0..=1.0).contains(&rate_per_tick) {
            return Err(ScheduleError::InvalidRate(rate_per_tick));
        }
        Ok(Self { rate_per_tick, building, rng })
    }

    pub fn rate_per_tick(&self) -> f64 {
        self.rate_per_tick
    }
}

impl TrafficSource for RandomTraffic {
    fn calls_at(&mut self, now: Tick, out: &mut Vec<ScheduledCall>) {
        if !self.rng.gen_bool(self.rate_per_tick) {
            return;
        }
        let (origin, destination, party_size) = self.rng.trip(&self.building);
        out.push(ScheduledCall { tick: now, origin, destination, party_size });
    }
}

// ── Chained ───────────────────────────────────────────────────────────────────

/// Two sources merged tick by tick; the first source's calls come first.
pub struct ChainedTraffic<A: TrafficSource, B: TrafficSource> {
    first:  A,
    second: B,
}

impl<A: TrafficSource, B: TrafficSource> TrafficSource for ChainedTraffic<A, B> {
    fn calls_at(&mut self, now: Tick, out: &mut Vec<ScheduledCall>) {
        self.first.calls_at(now, out);
        self.second.calls_at(now, out);
    }

    fn is_exhausted(&self) -> bool {
        self.first.is_exhausted() && self.second.is_exhausted()
    }
}

/// Extension trait that adds `.and(other)` to any `TrafficSource`.
pub trait TrafficSourceExt: TrafficSource + Sized {
    fn and<B: TrafficSource>(self, other: B) -> ChainedTraffic<Self, B> {
        ChainedTraffic { first: self, second: other }
    }
}

impl<S: TrafficSource + Sized> TrafficSourceExt for S {}
