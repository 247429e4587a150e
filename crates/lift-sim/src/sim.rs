//! The `Sim` coordinator and its tick loop.

use log::{debug, error, info, warn};

use lift_core::{Floor, Request, RequestId, SimClock, SimConfig, Tick, UnitId, validate_trip};
use lift_dispatch::{
    Decision, DispatchPolicy, DispatchResult, FleetSnapshot, RotatingPolicy, RotationCursor,
    ShortestQueuePolicy, WeightedFactorPolicy,
};
use lift_schedule::{NoTraffic, ScheduledCall, TrafficSource, WakeQueue};
use lift_unit::{PipelineConfig, Step, Unit, UnitError, UnitEvent};

use crate::{
    ComparisonStats, DispatchRecord, HoldBuffer, SimError, SimObserver, SimResult, SimView,
    SystemStats, UnitStatus, baseline_estimate,
};

// ── Events ────────────────────────────────────────────────────────────────────

/// An entry in the wake queue.  Each carries the epoch it was scheduled in;
/// anything scheduled before the latest reset is discarded when it comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SimEvent {
    Unit { unit: UnitId, epoch: u64 },
    Release { request: Request, epoch: u64 },
    IdleSweep { epoch: u64 },
}

impl SimEvent {
    fn epoch(&self) -> u64 {
        match *self {
            SimEvent::Unit { epoch, .. }
            | SimEvent::Release { epoch, .. }
            | SimEvent::IdleSweep { epoch } => epoch,
        }
    }
}

/// Outcome of an accepted submission.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Dispatched(DispatchRecord),
    /// Buffered by hold mode; `pending` is the buffer length afterwards.
    Held { request: Request, pending: usize },
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The fleet coordinator.
///
/// `Sim` owns every unit, the wake queue, the policies' carry-state, and all
/// statistics.  It is driven one tick at a time:
///
/// 1. **Wake**: drain events scheduled for this tick (unit transitions, paced
///    releases, the idle sweep), skipping events from before the last reset.
/// 2. **Traffic**: ask the `TrafficSource` for calls arriving this tick and
///    push each through the same intake path as [`Sim::submit`].
/// 3. **Report**: hand requests dropped by pipeline faults to the observer.
///
/// Units only change through their own transition methods, called from here,
/// so each unit has a single writer and at most one pipeline.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<T: TrafficSource = NoTraffic> {
    config:           SimConfig,
    clock:            SimClock,
    pipeline:         PipelineConfig,
    units:            Vec<Unit>,
    wake_queue:       WakeQueue<SimEvent>,
    weighted:         WeightedFactorPolicy,
    cursor:           RotationCursor,
    comparison:       ComparisonStats,
    last_dispatch:    Option<DispatchRecord>,
    hold:             HoldBuffer,
    /// Bumped by every reset.
    epoch:            u64,
    next_request_id:  u64,
    dropped_requests: u64,
    /// Drops not yet reported to an observer.
    recent_drops:     Vec<(Tick, UnitId, Request)>,
    traffic:          T,
    /// Reused buffer for each tick's traffic.
    arrivals:         Vec<ScheduledCall>,
}

impl<T: TrafficSource> Sim<T> {
    /// Assemble a simulation from an already validated config.
    pub(crate) fn from_parts(config: SimConfig, traffic: T) -> Self {
        let mut sim = Self {
            clock:            SimClock::new(config.timing.tick_duration_ms),
            pipeline:         PipelineConfig::from_config(&config),
            weighted:         WeightedFactorPolicy::new(config.weights.clone()),
            units:            Vec::new(),
            wake_queue:       WakeQueue::new(),
            cursor:           RotationCursor::default(),
            comparison:       ComparisonStats::default(),
            last_dispatch:    None,
            hold:             HoldBuffer::default(),
            epoch:            0,
            next_request_id:  0,
            dropped_requests: 0,
            recent_drops:     Vec::new(),
            traffic,
            arrivals:         Vec::new(),
            config,
        };
        sim.init_fleet();
        sim
    }

    /// Park a fresh fleet at the standby floors and schedule the first sweep.
    fn init_fleet(&mut self) {
        let now = self.clock.now();
        self.units = self
            .config
            .building
            .standby_floors()
            .into_iter()
            .enumerate()
            .map(|(i, floor)| Unit::new(UnitId(i as u32), floor, now))
            .collect();
        self.wake_queue.push(
            now + self.config.timing.idle_sweep_interval_ticks,
            SimEvent::IdleSweep { epoch: self.epoch },
        );
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig { &self.config }
    pub fn clock(&self) -> &SimClock { &self.clock }
    pub fn now(&self) -> Tick { self.clock.now() }
    pub fn units(&self) -> &[Unit] { &self.units }
    pub fn unit(&self, id: UnitId) -> Option<&Unit> { self.units.get(id.index()) }
    pub fn comparison(&self) -> &ComparisonStats { &self.comparison }
    pub fn last_dispatch(&self) -> Option<&DispatchRecord> { self.last_dispatch.as_ref() }
    pub fn hold(&self) -> &HoldBuffer { &self.hold }
    pub fn is_held(&self) -> bool { self.hold.is_active() }
    pub fn pending_len(&self) -> usize { self.hold.pending_len() }
    pub fn rotation_cursor(&self) -> RotationCursor { self.cursor }
    pub fn epoch(&self) -> u64 { self.epoch }
    pub fn dropped_requests(&self) -> u64 { self.dropped_requests }
    pub fn traffic(&self) -> &T { &self.traffic }

    pub fn system_stats(&self) -> SystemStats {
        SystemStats::aggregate(self.units.iter().map(Unit::counters))
    }

    /// The read-only fleet copy every policy scores against.
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot::new(
            self.clock.now(),
            self.clock.tick_duration_ms,
            self.config.building.clone(),
            self.units.iter().map(Unit::view).collect(),
        )
    }

    pub fn view(&self) -> SimView {
        SimView {
            now:              self.clock.now(),
            units:            self.units.iter().map(UnitStatus::from).collect(),
            last_dispatch:    self.last_dispatch.clone(),
            comparison:       self.comparison.rows(),
            pending:          self.hold.pending_len(),
            hold:             self.hold.is_active(),
            system:           self.system_stats(),
            dropped_requests: self.dropped_requests,
        }
    }

    /// No unit has work, nothing is held, and no release is still pacing out.
    pub fn is_quiescent(&self) -> bool {
        self.units.iter().all(|u| !u.is_busy() && u.queue_len() == 0)
            && self.hold.pending_len() == 0
            && self.hold.in_flight() == 0
    }

    // ── Intake ────────────────────────────────────────────────────────────

    /// Submit a request at the current tick.
    ///
    /// Invalid requests are rejected with [`SimError::InvalidRequest`] and
    /// change nothing.  In hold mode a valid request is buffered; otherwise it
    /// is dispatched to the weighted-factor unit immediately.
    pub fn submit(&mut self, origin: Floor, destination: Floor, party_size: u32) -> SimResult<Submission> {
        self.intake(origin, destination, party_size, false)
    }

    /// Like [`submit`][Self::submit] for a caller that has already validated
    /// the request.  The policies still reject a bad request at dispatch.
    pub fn submit_prevalidated(
        &mut self,
        origin:      Floor,
        destination: Floor,
        party_size:  u32,
    ) -> SimResult<Submission> {
        self.intake(origin, destination, party_size, true)
    }

    fn intake(
        &mut self,
        origin:       Floor,
        destination:  Floor,
        party_size:   u32,
        prevalidated: bool,
    ) -> SimResult<Submission> {
        if !prevalidated {
            validate_trip(origin, destination, party_size, &self.config.building)?;
        }
        let now = self.clock.now();
        let request = Request::new(RequestId(self.next_request_id), origin, destination, party_size, now);
        self.next_request_id += 1;

        if self.hold.is_active() {
            let pending = self.hold.push(request);
            info!("hold: request {} ({origin} → {destination}) buffered, {pending} pending", request.id);
            return Ok(Submission::Held { request, pending });
        }
        self.dispatch(request, now).map(Submission::Dispatched)
    }

    // ── Hold mode ─────────────────────────────────────────────────────────

    /// Flip hold mode and return the new state.  Turning it off releases any
    /// pending requests.
    pub fn toggle_hold(&mut self) -> bool {
        let released = self.hold.toggle();
        info!("hold mode {}", if self.hold.is_active() { "on" } else { "off" });
        self.schedule_release(released);
        self.hold.is_active()
    }

    pub fn set_hold(&mut self, on: bool) {
        if self.hold.is_active() != on {
            self.toggle_hold();
        }
    }

    /// Drain the pending buffer and replay it, one request per
    /// `release_pacing_ticks`, starting with the current tick.  Returns the
    /// number of requests released.
    pub fn release(&mut self) -> usize {
        let released = self.hold.release();
        let count = released.len();
        info!("releasing {count} held requests");
        self.schedule_release(released);
        count
    }

    fn schedule_release(&mut self, requests: Vec<Request>) {
        let now = self.clock.now();
        let pacing = self.config.timing.release_pacing_ticks;
        for (i, request) in requests.into_iter().enumerate() {
            self.wake_queue.push(now + i as u64 * pacing, SimEvent::Release { request, epoch: self.epoch });
        }
    }

    // ── Reset ─────────────────────────────────────────────────────────────

    /// Return to the initial fleet state: units idle at their standby floors,
    /// every statistic zeroed, rotation cursor and hold buffer cleared.
    ///
    /// Safe at any point.  Pending wakes from the old fleet are invalidated
    /// by the epoch bump.  The clock is not rewound.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.cursor.reset();
        self.comparison = ComparisonStats::default();
        self.last_dispatch = None;
        self.hold = HoldBuffer::default();
        self.dropped_requests = 0;
        self.recent_drops.clear();
        self.init_fleet();
        info!("reset at {} (epoch {})", self.clock.now(), self.epoch);
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run from the current tick to `config.total_ticks`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        let end = Tick(self.config.total_ticks);
        while self.clock.now() < end {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.now(), &self.view());
    }

    /// Run exactly `n` ticks from the current position (ignores `total_ticks`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Step until [`is_quiescent`][Self::is_quiescent] or `max_ticks` have
    /// elapsed.  Returns `true` if the fleet went quiet.
    pub fn run_until_quiescent<O: SimObserver>(&mut self, max_ticks: u64, observer: &mut O) -> bool {
        for _ in 0..max_ticks {
            if self.is_quiescent() {
                return true;
            }
            self.step(observer);
        }
        self.is_quiescent()
    }

    /// Process the current tick and advance the clock.  Returns the number
    /// of events and calls handled.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> usize {
        let now = self.clock.now();
        observer.on_tick_start(now);
        let handled = self.process_tick(now, observer);
        observer.on_tick_end(now, handled);

        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.view());
        }
        self.clock.advance();
        handled
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> usize {
        let mut handled = 0;

        // ── Phase 1: due events ───────────────────────────────────────────
        if let Some(events) = self.wake_queue.drain_tick(now) {
            for event in events {
                if event.epoch() != self.epoch {
                    debug!("discarding {event:?} from before reset");
                    continue;
                }
                handled += 1;
                match event {
                    SimEvent::Unit { unit, .. } => self.wake_unit(unit, now, observer),
                    SimEvent::Release { request, .. } => {
                        match self.dispatch(request, now) {
                            Ok(record) => observer.on_dispatch(&record),
                            Err(e) => warn!("released request {} not dispatched: {e}", request.id),
                        }
                        if self.hold.finish_one() {
                            info!("release finished, hold mode back on");
                        }
                    }
                    SimEvent::IdleSweep { .. } => self.idle_sweep(now),
                }
            }
        }

        // ── Phase 2: traffic ──────────────────────────────────────────────
        let mut arrivals = std::mem::take(&mut self.arrivals);
        self.traffic.calls_at(now, &mut arrivals);
        for call in arrivals.drain(..) {
            handled += 1;
            match self.intake(call.origin, call.destination, call.party_size, false) {
                Ok(Submission::Dispatched(record)) => observer.on_dispatch(&record),
                Ok(Submission::Held { request, pending }) => observer.on_held(now, &request, pending),
                Err(e) => {
                    warn!("rejected call at {now} ({} → {}, party {}): {e}", call.origin, call.destination, call.party_size);
                    observer.on_rejected(now, &call, &e);
                }
            }
        }
        self.arrivals = arrivals;

        // ── Phase 3: report drops ─────────────────────────────────────────
        for (tick, unit, request) in self.recent_drops.drain(..) {
            observer.on_dropped(tick, unit, &request);
        }

        handled
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Score `request` with all three policies on one snapshot, record the
    /// baselines' estimates, and enqueue it on the weighted-factor choice.
    fn dispatch(&mut self, request: Request, now: Tick) -> SimResult<DispatchRecord> {
        let fleet = self.snapshot();
        let (weighted, shortest_queue, rotating) =
            match evaluate(&self.weighted, &mut self.cursor, &fleet, &request) {
                Ok(decisions) => decisions,
                Err(e) => {
                    let e = SimError::from(e);
                    if let SimError::InvalidFleetState(msg) = &e {
                        error!("dispatch of request {} aborted: {msg}", request.id);
                    }
                    return Err(e);
                }
            };

        let b = &self.config.building;
        let cmp = &self.config.comparison;
        let shortest_queue_estimate_secs =
            baseline_estimate(fleet.unit(shortest_queue.unit)?, &request, b, cmp.shortest_queue_inflation);
        let rotating_estimate_secs =
            baseline_estimate(fleet.unit(rotating.unit)?, &request, b, cmp.rotating_inflation);
        self.comparison.shortest_queue.record(shortest_queue_estimate_secs);
        self.comparison.rotating.record(rotating_estimate_secs);

        let target = weighted.unit;
        let unit = self
            .units
            .get_mut(target.index())
            .ok_or_else(|| SimError::InvalidFleetState(format!("{target} is not in the fleet")))?;
        unit.set_current_score(weighted.score);
        match unit.enqueue(request, now, &self.pipeline) {
            Ok(Some(at)) => self.wake_queue.push(at, SimEvent::Unit { unit: target, epoch: self.epoch }),
            Ok(None) => {}
            Err(fault) => self.recover(fault, now),
        }

        info!(
            "request {} ({} → {}, party {}) → {}: {}",
            request.id, request.origin, request.destination, request.party_size, target, weighted.reason()
        );
        let record = DispatchRecord {
            at: now,
            request,
            weighted,
            shortest_queue,
            rotating,
            shortest_queue_estimate_secs,
            rotating_estimate_secs,
        };
        self.last_dispatch = Some(record.clone());
        Ok(record)
    }

    // ── Unit plumbing ─────────────────────────────────────────────────────

    fn wake_unit<O: SimObserver>(&mut self, id: UnitId, now: Tick, observer: &mut O) {
        let Some(unit) = self.units.get_mut(id.index()) else {
            error!("wake for {id}, which is not in the fleet");
            return;
        };
        match unit.on_wake(now, &self.pipeline) {
            Ok(step) => self.apply_step(id, step, now, observer),
            Err(fault) => self.recover(fault, now),
        }
    }

    fn apply_step<O: SimObserver>(&mut self, id: UnitId, step: Step, now: Tick, observer: &mut O) {
        if let Some(at) = step.next_wake {
            self.wake_queue.push(at, SimEvent::Unit { unit: id, epoch: self.epoch });
        }
        match step.event {
            Some(UnitEvent::Completed(completion)) => {
                let system = self.system_stats();
                self.comparison.sync_weighted(&system);
                observer.on_completion(&completion);
            }
            Some(UnitEvent::StandbyReached { floor }) => debug!("{id} parked at standby floor {floor}"),
            None => {}
        }
        self.note_dropped(id, step.dropped, now);
    }

    /// Force the faulted unit back to idle and restart what is left of its
    /// queue.  Faults never propagate past this point.
    fn recover(&mut self, fault: UnitError, now: Tick) {
        let id = fault.unit();
        warn!("pipeline fault: {fault}; forcing {id} back to idle");
        let Some(unit) = self.units.get_mut(id.index()) else {
            error!("pipeline fault reported for {id}, which is not in the fleet");
            return;
        };
        let recovery = unit.recover_from_fault(now, &self.pipeline);
        if let Some(at) = recovery.next_wake {
            self.wake_queue.push(at, SimEvent::Unit { unit: id, epoch: self.epoch });
        }
        self.note_dropped(id, recovery.dropped, now);
    }

    fn note_dropped(&mut self, id: UnitId, dropped: Vec<Request>, now: Tick) {
        for request in dropped {
            warn!("{id}: dropped request {} ({} → {})", request.id, request.origin, request.destination);
            self.dropped_requests += 1;
            self.recent_drops.push((now, id, request));
        }
    }

    /// Send every unit that has idled past the timeout back to standby, then
    /// schedule the next sweep.
    fn idle_sweep(&mut self, now: Tick) {
        let timeout = self.config.timing.idle_timeout_ticks;
        for i in 0..self.units.len() {
            let unit = &mut self.units[i];
            if !unit.wants_standby(now, timeout) {
                continue;
            }
            let id = unit.id();
            match unit.begin_standby_return(now, &self.pipeline) {
                Ok(Some(at)) => self.wake_queue.push(at, SimEvent::Unit { unit: id, epoch: self.epoch }),
                Ok(None) => {}
                Err(fault) => self.recover(fault, now),
            }
        }
        self.wake_queue.push(
            now + self.config.timing.idle_sweep_interval_ticks,
            SimEvent::IdleSweep { epoch: self.epoch },
        );
    }
}

// ── Policy evaluation ─────────────────────────────────────────────────────────

/// Run the three policies against one snapshot.  With the `parallel` feature
/// they run on Rayon's thread pool; the result is identical either way.
fn evaluate(
    weighted: &WeightedFactorPolicy,
    cursor:   &mut RotationCursor,
    fleet:    &FleetSnapshot,
    request:  &Request,
) -> DispatchResult<(Decision, Decision, Decision)> {
    #[cfg(not(feature = "parallel"))]
    {
        let w = weighted.choose(fleet, request, &mut ())?;
        let sq = ShortestQueuePolicy.choose(fleet, request, &mut ())?;
        let rr = RotatingPolicy.choose(fleet, request, cursor)?;
        Ok((w, sq, rr))
    }

    #[cfg(feature = "parallel")]
    {
        let (w, (sq, rr)) = rayon::join(
            || weighted.choose(fleet, request, &mut ()),
            || {
                rayon::join(
                    || ShortestQueuePolicy.choose(fleet, request, &mut ()),
                    || RotatingPolicy.choose(fleet, request, cursor),
                )
            },
        );
        Ok((w?, sq?, rr?))
    }
}
