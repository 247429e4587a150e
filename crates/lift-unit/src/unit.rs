//! A single transport unit and its execution pipeline.

use std::collections::VecDeque;

use lift_core::{BuildingConfig, Floor, Request, SimConfig, Tick, UnitId, floor_distance, trip_secs};
use lift_dispatch::UnitView;
use log::{debug, info, warn};

use crate::{Leg, Stop, UnitError, UnitPhase, UnitResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// The slice of `SimConfig` the pipeline reads.  Shared by every unit.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub building:         BuildingConfig,
    pub floor_step_ticks: u64,
    pub dwell_ticks:      u64,
}

impl PipelineConfig {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            building:         config.building.clone(),
            floor_step_ticks: config.timing.floor_step_ticks,
            dwell_ticks:      config.timing.dwell_ticks,
        }
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// A queued request plus the unit's floor when it was assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueuedRequest {
    pub request:       Request,
    pub assigned_from: Floor,
}

/// Cumulative per-unit statistics.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitCounters {
    pub served:           u64,
    /// Sum of the travel-time estimates recorded at each completion, seconds.
    pub total_wait_secs:  f64,
    pub total_distance_m: f64,
    pub total_passengers: u64,
}

impl UnitCounters {
    /// Mean recorded wait, 0 when nothing has been served.
    pub fn avg_wait_secs(&self) -> f64 {
        if self.served == 0 { 0.0 } else { self.total_wait_secs / self.served as f64 }
    }
}

/// Accounting record emitted when a request finishes its dropoff dwell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Completion {
    pub unit:        UnitId,
    pub request:     Request,
    /// `trip_secs(assigned_from → origin → destination) × real_time_factor`.
    pub travel_secs: f64,
    pub finished:    Tick,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UnitEvent {
    Completed(Completion),
    StandbyReached { floor: Floor },
}

/// Result of one transition: when to wake the unit next, and anything the
/// coordinator has to account for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Step {
    pub next_wake: Option<Tick>,
    pub event:     Option<UnitEvent>,
    /// Queued requests dropped because they faulted when the unit tried to
    /// start them after this transition.
    pub dropped:   Vec<Request>,
}

impl Step {
    fn wake(at: Tick) -> Self {
        Step { next_wake: Some(at), ..Step::default() }
    }
}

/// Outcome of [`Unit::recover_from_fault`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recovery {
    /// Requests dropped because their pipeline faulted.
    pub dropped:   Vec<Request>,
    pub next_wake: Option<Tick>,
}

// ── Unit ──────────────────────────────────────────────────────────────────────

/// One car.  All of its fields are private and only change through the
/// transition methods below, so the unit is the single writer of its own
/// state.
#[derive(Clone, Debug)]
pub struct Unit {
    id:            UnitId,
    standby_floor: Floor,
    floor:         Floor,
    phase:         UnitPhase,
    queue:         VecDeque<QueuedRequest>,
    busy:          bool,
    counters:      UnitCounters,
    last_activity: Tick,
    current_score: f64,
    /// The only tick at which `on_wake` will act.
    pending_wake:  Option<Tick>,
}

impl Unit {
    /// A fresh idle unit parked at its standby floor.
    pub fn new(id: UnitId, standby_floor: Floor, now: Tick) -> Self {
        Self {
            id,
            standby_floor,
            floor: standby_floor,
            phase: UnitPhase::Idle,
            queue: VecDeque::new(),
            busy: false,
            counters: UnitCounters::default(),
            last_activity: now,
            current_score: 0.0,
            pending_wake: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> UnitId { self.id }
    pub fn floor(&self) -> Floor { self.floor }
    pub fn standby_floor(&self) -> Floor { self.standby_floor }
    pub fn phase(&self) -> UnitPhase { self.phase }
    pub fn is_busy(&self) -> bool { self.busy }
    pub fn queue_len(&self) -> usize { self.queue.len() }
    pub fn counters(&self) -> &UnitCounters { &self.counters }
    pub fn last_activity(&self) -> Tick { self.last_activity }
    pub fn current_score(&self) -> f64 { self.current_score }
    pub fn pending_wake(&self) -> Option<Tick> { self.pending_wake }

    pub fn queue(&self) -> impl Iterator<Item = &QueuedRequest> {
        self.queue.iter()
    }

    /// Display-only score of the most recent assignment.
    pub fn set_current_score(&mut self, score: f64) {
        self.current_score = score;
    }

    /// Read-only copy for the dispatch policies.
    pub fn view(&self) -> UnitView {
        UnitView {
            id:            self.id,
            floor:         self.floor,
            busy:          self.busy,
            queue:         self.queue.iter().map(|q| q.request).collect(),
            last_activity: self.last_activity,
        }
    }

    /// Eligible for an idle-return sweep at `now`.
    pub fn wants_standby(&self, now: Tick, idle_timeout_ticks: u64) -> bool {
        !self.busy
            && self.queue.is_empty()
            && self.floor != self.standby_floor
            && now.since(self.last_activity) > idle_timeout_ticks
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Append `request` to the queue.  If the unit is idle its pipeline starts
    /// in the same call, so no other submission can slip in between.
    pub fn enqueue(&mut self, request: Request, now: Tick, cfg: &PipelineConfig) -> UnitResult<Option<Tick>> {
        self.queue.push_back(QueuedRequest { request, assigned_from: self.floor });
        debug!("{}: queued request {} ({} waiting)", self.id, request.id, self.queue.len());
        if self.busy {
            return Ok(None);
        }
        let step = self.start_next(now, cfg)?;
        Ok(step.next_wake)
    }

    /// Drive an idle, empty unit back to its standby floor.  Returns the first
    /// wake tick, or `None` if the unit is not eligible.
    pub fn begin_standby_return(&mut self, now: Tick, cfg: &PipelineConfig) -> UnitResult<Option<Tick>> {
        if self.busy || !self.queue.is_empty() || self.floor == self.standby_floor {
            return Ok(None);
        }
        info!("{}: idle at floor {}, returning to standby floor {}", self.id, self.floor, self.standby_floor);
        self.busy = true;
        let step = self.begin_leg(Leg::ToStandby, self.standby_floor, now, cfg)?;
        Ok(step.next_wake)
    }

    /// Advance the state machine.  Wakes for any tick other than the one the
    /// unit asked for are ignored.
    pub fn on_wake(&mut self, now: Tick, cfg: &PipelineConfig) -> UnitResult<Step> {
        if self.pending_wake != Some(now) {
            return Ok(Step::default());
        }
        self.pending_wake = None;

        match self.phase {
            UnitPhase::Idle => Ok(Step::default()),

            UnitPhase::Moving { leg, target } => {
                if self.floor < target {
                    self.floor += 1;
                } else if self.floor > target {
                    self.floor -= 1;
                }
                if self.floor == target {
                    self.arrive(leg, now, cfg)
                } else {
                    Ok(self.schedule(now + cfg.floor_step_ticks))
                }
            }

            UnitPhase::Dwelling { stop: Stop::Pickup } => {
                let head = self.head()?;
                self.begin_leg(Leg::ToDropoff, head.request.destination, now, cfg)
            }

            UnitPhase::Dwelling { stop: Stop::Dropoff } => self.complete(now, cfg),
        }
    }

    /// Force the unit back to idle after a pipeline fault.
    ///
    /// The request that was in flight (if any) is dropped, never retried.
    /// Remaining queued work is restarted; requests that fault immediately on
    /// restart are dropped as well, so the unit always ends up either running
    /// a healthy pipeline or idle.
    pub fn recover_from_fault(&mut self, now: Tick, cfg: &PipelineConfig) -> Recovery {
        let mut recovery = Recovery::default();
        let mut serving = self.phase.is_serving();
        loop {
            if serving {
                if let Some(q) = self.queue.pop_front() {
                    recovery.dropped.push(q.request);
                }
            }
            self.busy = false;
            self.phase = UnitPhase::Idle;
            self.pending_wake = None;
            self.current_score = 0.0;
            self.last_activity = now;

            if self.queue.is_empty() {
                return recovery;
            }
            match self.start_next(now, cfg) {
                Ok(step) => {
                    recovery.next_wake = step.next_wake;
                    return recovery;
                }
                Err(_) => serving = true,
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn head(&self) -> UnitResult<QueuedRequest> {
        self.queue.front().copied().ok_or(UnitError::MissingRequest { unit: self.id })
    }

    fn schedule(&mut self, at: Tick) -> Step {
        self.pending_wake = Some(at);
        Step::wake(at)
    }

    /// `Idle → Moving(ToPickup)` for the head of the queue.
    fn start_next(&mut self, now: Tick, cfg: &PipelineConfig) -> UnitResult<Step> {
        let head = self.head()?;
        self.busy = true;
        debug!("{}: starting request {} ({} → {})", self.id, head.request.id, head.request.origin, head.request.destination);
        self.begin_leg(Leg::ToPickup, head.request.origin, now, cfg)
    }

    /// Enter `Moving { leg, target }`.  Distance for the whole leg is accrued
    /// here, once.  A zero-length leg arrives immediately.
    fn begin_leg(&mut self, leg: Leg, target: Floor, now: Tick, cfg: &PipelineConfig) -> UnitResult<Step> {
        let floors = cfg.building.floors;
        if target >= floors {
            return Err(UnitError::FloorOutOfRange { unit: self.id, floor: target, floors });
        }
        self.counters.total_distance_m +=
            floor_distance(self.floor, target) as f64 * cfg.building.floor_height_m;
        self.phase = UnitPhase::Moving { leg, target };
        if self.floor == target {
            return self.arrive(leg, now, cfg);
        }
        Ok(self.schedule(now + cfg.floor_step_ticks))
    }

    fn arrive(&mut self, leg: Leg, now: Tick, cfg: &PipelineConfig) -> UnitResult<Step> {
        match leg {
            Leg::ToPickup => {
                self.phase = UnitPhase::Dwelling { stop: Stop::Pickup };
                Ok(self.schedule(now + cfg.dwell_ticks))
            }
            Leg::ToDropoff => {
                self.phase = UnitPhase::Dwelling { stop: Stop::Dropoff };
                Ok(self.schedule(now + cfg.dwell_ticks))
            }
            Leg::ToStandby => {
                self.phase = UnitPhase::Idle;
                self.busy = false;
                self.last_activity = now;
                debug!("{}: parked at standby floor {}", self.id, self.floor);
                // A request may have been queued while repositioning.
                let mut step = self.continue_queue(now, cfg);
                step.event = Some(UnitEvent::StandbyReached { floor: self.floor });
                Ok(step)
            }
        }
    }

    /// `Dwelling(Dropoff) → Idle`, then straight into the next request if
    /// one is waiting.
    fn complete(&mut self, now: Tick, cfg: &PipelineConfig) -> UnitResult<Step> {
        let done = self.queue.pop_front().ok_or(UnitError::MissingRequest { unit: self.id })?;
        let b = &cfg.building;
        let request = done.request;
        let travel_secs =
            trip_secs(done.assigned_from, request.origin, request.destination, b) * b.real_time_factor;

        self.counters.served += 1;
        self.counters.total_wait_secs += travel_secs;
        self.counters.total_passengers += request.party_size as u64;
        self.last_activity = now;
        self.current_score = 0.0;
        self.busy = false;
        self.phase = UnitPhase::Idle;

        info!("{}: completed request {} at floor {} ({travel_secs:.1}s)", self.id, request.id, self.floor);
        let completion = Completion { unit: self.id, request, travel_secs, finished: now };

        let mut step = self.continue_queue(now, cfg);
        step.event = Some(UnitEvent::Completed(completion));
        Ok(step)
    }

    /// Start the next queued request, if any, from an idle state.  A fault
    /// here must not swallow the event that led to it, so it is recovered in
    /// place rather than returned.
    fn continue_queue(&mut self, now: Tick, cfg: &PipelineConfig) -> Step {
        if self.queue.is_empty() {
            return Step::default();
        }
        match self.start_next(now, cfg) {
            Ok(step) => step,
            Err(e) => {
                warn!("{e}; dropping the faulted request");
                let recovery = self.recover_from_fault(now, cfg);
                Step { next_wake: recovery.next_wake, event: None, dropped: recovery.dropped }
            }
        }
    }
}
