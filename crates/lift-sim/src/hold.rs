//! Hold-mode intake buffer.
//!
//! While hold mode is on, validated requests accumulate here instead of being
//! dispatched.  A release drains the buffer in one step and hands the requests
//! to the coordinator, which replays them one per pacing interval.  If hold
//! mode was on when the release started, it comes back on after the last
//! replayed request has been dispatched.

use lift_core::Request;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoldBuffer {
    active:    bool,
    pending:   Vec<Request>,
    /// Released requests not yet dispatched.
    in_flight: usize,
    /// Turn hold mode back on once `in_flight` reaches zero.
    restore:   bool,
}

impl HoldBuffer {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending(&self) -> &[Request] {
        &self.pending
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Buffer `request`; returns the new pending length.
    pub fn push(&mut self, request: Request) -> usize {
        self.pending.push(request);
        self.pending.len()
    }

    /// Flip hold mode.  Turning it off releases whatever is pending, and the
    /// released requests are returned for replay.
    pub fn toggle(&mut self) -> Vec<Request> {
        self.restore = false;
        if self.active {
            self.active = false;
            self.drain()
        } else {
            self.active = true;
            Vec::new()
        }
    }

    /// Drain everything pending for replay.  Hold mode is suspended until the
    /// replay finishes and then restored if it was on.
    pub fn release(&mut self) -> Vec<Request> {
        let was_active = self.active || self.restore;
        self.active = false;
        let released = self.drain();
        if self.in_flight == 0 {
            self.active = was_active;
            self.restore = false;
        } else {
            self.restore = was_active;
        }
        released
    }

    /// Record that one released request has been dispatched.  Returns `true`
    /// if this restored hold mode.
    pub fn finish_one(&mut self) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 && self.restore {
            self.restore = false;
            self.active = true;
            return true;
        }
        false
    }

    fn drain(&mut self) -> Vec<Request> {
        let released = std::mem::take(&mut self.pending);
        self.in_flight += released.len();
        released
    }
}
