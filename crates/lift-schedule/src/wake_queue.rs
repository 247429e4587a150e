//! `WakeQueue` — sparse per-tick event queue.
//!
//! Units spend most ticks between transitions: a floor step lasts several
//! ticks, a dwell longer.  Instead of polling every unit every tick, whoever
//! schedules a delayed action registers the tick at which it needs attention.
//! Each tick the simulation drains only the events scheduled for that tick.
//!
//! Events pushed for the same tick are returned in push order.

use std::collections::BTreeMap;

use lift_core::Tick;

/// A priority queue mapping simulation ticks to the events due at that tick.
#[derive(Clone, Debug)]
pub struct WakeQueue<E> {
    inner: BTreeMap<Tick, Vec<E>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl<E> Default for WakeQueue<E> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<E> WakeQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at `tick`.
    pub fn push(&mut self, tick: Tick, event: E) {
        self.inner.entry(tick).or_default().push(event);
        self.total += 1;
    }

    /// Remove and return all events scheduled for exactly `tick`.
    ///
    /// Returns `None` if nothing is queued for that tick (the common case).
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<E>> {
        let events = self.inner.remove(&tick)?;
        self.total -= events.len();
        Some(events)
    }

    /// Total number of queued events across all future ticks.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
