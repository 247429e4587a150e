//! Unit tests for lift-unit.

use lift_core::{Request, RequestId, SimConfig, Tick, UnitId};

use crate::{PipelineConfig, Unit, UnitEvent};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Default building: 10 floors, 6 ticks per floor, 9 ticks of dwell.
fn cfg() -> PipelineConfig {
    PipelineConfig::from_config(&SimConfig::default())
}

fn request(id: u64, origin: u32, destination: u32, party: u32) -> Request {
    Request::new(RequestId(id), origin, destination, party, Tick(0))
}

/// Follow a unit's wakes until it stops asking for one, collecting events.
/// Asserts the busy flag stays set at every intermediate wake.
fn drive(unit: &mut Unit, first: Option<Tick>, cfg: &PipelineConfig) -> (Tick, Vec<UnitEvent>) {
    let mut events = Vec::new();
    let mut at = first;
    let mut last = Tick::ZERO;
    while let Some(t) = at {
        assert!(unit.is_busy(), "{} not busy while a wake is pending", unit.id());
        let step = unit.on_wake(t, cfg).unwrap();
        assert!(step.dropped.is_empty());
        events.extend(step.event);
        at = step.next_wake;
        last = t;
    }
    (last, events)
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use lift_core::trip_secs;

    use super::*;
    use crate::{Leg, Stop, UnitPhase};

    #[test]
    fn enqueue_on_idle_unit_starts_immediately() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let wake = unit.enqueue(request(1, 2, 8, 2), Tick(0), &cfg).unwrap();
        assert_eq!(wake, Some(Tick(6)));
        assert!(unit.is_busy());
        assert_eq!(unit.phase(), UnitPhase::Moving { leg: Leg::ToPickup, target: 2 });
        assert_eq!(unit.pending_wake(), Some(Tick(6)));
    }

    #[test]
    fn moves_one_floor_per_step_then_dwells() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        unit.enqueue(request(1, 2, 8, 2), Tick(0), &cfg).unwrap();

        let step = unit.on_wake(Tick(6), &cfg).unwrap();
        assert_eq!(unit.floor(), 1);
        assert_eq!(step.next_wake, Some(Tick(12)));

        let step = unit.on_wake(Tick(12), &cfg).unwrap();
        assert_eq!(unit.floor(), 2);
        assert_eq!(unit.phase(), UnitPhase::Dwelling { stop: Stop::Pickup });
        assert_eq!(step.next_wake, Some(Tick(21)));

        let step = unit.on_wake(Tick(21), &cfg).unwrap();
        assert_eq!(unit.phase(), UnitPhase::Moving { leg: Leg::ToDropoff, target: 8 });
        assert_eq!(step.next_wake, Some(Tick(27)));
    }

    #[test]
    fn completion_updates_counters() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let first = unit.enqueue(request(1, 2, 8, 2), Tick(0), &cfg).unwrap();
        let (finished, events) = drive(&mut unit, first, &cfg);

        // 2 floors + dwell + 6 floors + dwell
        assert_eq!(finished, Tick(12 + 9 + 36 + 9));
        assert_eq!(events.len(), 1);
        let UnitEvent::Completed(c) = &events[0] else {
            panic!("expected a completion, got {:?}", events[0]);
        };
        assert_eq!(c.request.id, RequestId(1));
        assert_eq!(c.finished, finished);
        let expected = trip_secs(0, 2, 8, &cfg.building) * cfg.building.real_time_factor;
        assert!((c.travel_secs - expected).abs() < 1e-9);
        assert!((c.travel_secs - 110.0).abs() < 1e-9);

        let counters = unit.counters();
        assert_eq!(counters.served, 1);
        assert_eq!(counters.total_passengers, 2);
        assert!((counters.total_distance_m - 24.0).abs() < 1e-9);
        assert!((counters.avg_wait_secs() - 110.0).abs() < 1e-9);

        assert!(!unit.is_busy());
        assert!(unit.phase().is_idle());
        assert_eq!(unit.floor(), 8);
        assert_eq!(unit.last_activity(), finished);
        assert_eq!(unit.queue_len(), 0);
    }

    #[test]
    fn pickup_on_current_floor_skips_travel() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(1), 5, Tick(0));
        let wake = unit.enqueue(request(1, 5, 7, 1), Tick(0), &cfg).unwrap();
        assert_eq!(unit.phase(), UnitPhase::Dwelling { stop: Stop::Pickup });
        assert_eq!(wake, Some(Tick(9)));
        let (_, events) = drive(&mut unit, wake, &cfg);
        assert_eq!(events.len(), 1);
        assert!((unit.counters().total_distance_m - 6.0).abs() < 1e-9);
    }

    #[test]
    fn queued_requests_run_in_fifo_order() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let first = unit.enqueue(request(1, 1, 3, 1), Tick(0), &cfg).unwrap();
        assert_eq!(unit.enqueue(request(2, 9, 0, 1), Tick(1), &cfg).unwrap(), None);
        assert_eq!(unit.enqueue(request(3, 4, 6, 1), Tick(2), &cfg).unwrap(), None);
        assert_eq!(unit.queue_len(), 3);

        let (_, events) = drive(&mut unit, first, &cfg);
        let order: Vec<RequestId> = events
            .iter()
            .filter_map(|e| match e {
                UnitEvent::Completed(c) => Some(c.request.id),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![RequestId(1), RequestId(2), RequestId(3)]);
        assert_eq!(unit.counters().served, 3);
        assert_eq!(unit.floor(), 6);
    }

    #[test]
    fn travel_estimate_uses_floor_at_assignment() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let first = unit.enqueue(request(1, 1, 3, 1), Tick(0), &cfg).unwrap();
        // Assigned while still at floor 0, served after finishing at floor 3.
        unit.enqueue(request(2, 5, 6, 1), Tick(0), &cfg).unwrap();
        let (_, events) = drive(&mut unit, first, &cfg);
        let UnitEvent::Completed(second) = &events[1] else { panic!("expected completion") };
        let expected = trip_secs(0, 5, 6, &cfg.building) * cfg.building.real_time_factor;
        assert!((second.travel_secs - expected).abs() < 1e-9);
    }

    #[test]
    fn stale_wake_is_ignored() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        unit.enqueue(request(1, 3, 4, 1), Tick(0), &cfg).unwrap();
        let step = unit.on_wake(Tick(5), &cfg).unwrap();
        assert_eq!(step.next_wake, None);
        assert_eq!(unit.floor(), 0);
        assert_eq!(unit.pending_wake(), Some(Tick(6)));

        unit.on_wake(Tick(6), &cfg).unwrap();
        // A duplicate delivery of the same tick does nothing either.
        let step = unit.on_wake(Tick(6), &cfg).unwrap();
        assert_eq!(step.next_wake, None);
        assert_eq!(unit.floor(), 1);
    }

    #[test]
    fn view_reflects_queue() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(2), 9, Tick(0));
        unit.enqueue(request(1, 3, 4, 2), Tick(0), &cfg).unwrap();
        unit.enqueue(request(2, 6, 1, 3), Tick(0), &cfg).unwrap();
        let v = unit.view();
        assert_eq!(v.id, UnitId(2));
        assert!(v.busy);
        assert_eq!(v.queue_len(), 2);
        assert_eq!(v.queued_passengers(), 5);
        assert_eq!(v.leg_target(), Some(3));
    }
}

// ── Standby return ────────────────────────────────────────────────────────────

#[cfg(test)]
mod standby {
    use super::*;
    use crate::{Leg, UnitPhase};

    #[test]
    fn eligibility_requires_idle_timeout() {
        let unit = Unit::new(UnitId(0), 0, Tick(0));
        // Already at standby.
        assert!(!unit.wants_standby(Tick(1_000), 100));

        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let first = unit.enqueue(request(1, 2, 4, 1), Tick(0), &cfg).unwrap();
        let (done, _) = drive(&mut unit, first, &cfg);
        assert!(!unit.wants_standby(done + 100, 100));
        assert!(unit.wants_standby(done + 101, 100));
    }

    #[test]
    fn returns_to_standby_while_busy() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(1), 5, Tick(0));
        let first = unit.enqueue(request(1, 5, 7, 1), Tick(0), &cfg).unwrap();
        let (done, _) = drive(&mut unit, first, &cfg);
        assert_eq!(unit.floor(), 7);

        let now = done + 200;
        let wake = unit.begin_standby_return(now, &cfg).unwrap();
        assert_eq!(wake, Some(now + 6));
        assert!(unit.is_busy());
        assert_eq!(unit.phase(), UnitPhase::Moving { leg: Leg::ToStandby, target: 5 });

        let (parked, events) = drive(&mut unit, wake, &cfg);
        assert_eq!(events, vec![UnitEvent::StandbyReached { floor: 5 }]);
        assert_eq!(unit.floor(), 5);
        assert!(!unit.is_busy());
        assert_eq!(unit.last_activity(), parked);
        // Repositioning does not count as service.
        assert_eq!(unit.counters().served, 1);
    }

    #[test]
    fn busy_unit_is_not_sent_to_standby() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        unit.enqueue(request(1, 4, 6, 1), Tick(0), &cfg).unwrap();
        assert_eq!(unit.begin_standby_return(Tick(500), &cfg).unwrap(), None);
        assert_eq!(unit.phase(), UnitPhase::Moving { leg: Leg::ToPickup, target: 4 });
    }

    #[test]
    fn request_queued_during_return_runs_after_parking() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let first = unit.enqueue(request(1, 1, 2, 1), Tick(0), &cfg).unwrap();
        let (done, _) = drive(&mut unit, first, &cfg);

        let wake = unit.begin_standby_return(done + 200, &cfg).unwrap();
        assert_eq!(unit.enqueue(request(2, 3, 4, 1), done + 201, &cfg).unwrap(), None);

        let (_, events) = drive(&mut unit, wake, &cfg);
        assert_eq!(events[0], UnitEvent::StandbyReached { floor: 0 });
        assert!(matches!(&events[1], UnitEvent::Completed(c) if c.request.id == RequestId(2)));
        assert_eq!(unit.floor(), 4);
    }
}

// ── Faults ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod faults {
    use super::*;
    use crate::{UnitError, UnitPhase};

    #[test]
    fn out_of_range_leg_is_reported() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let err = unit.enqueue(request(1, 12, 3, 1), Tick(0), &cfg).unwrap_err();
        assert_eq!(err, UnitError::FloorOutOfRange { unit: UnitId(0), floor: 12, floors: 10 });

        let e: lift_core::LiftError = err.into();
        assert!(matches!(e, lift_core::LiftError::PipelineFault { unit: UnitId(0), .. }));
    }

    #[test]
    fn recovery_drops_faulted_request_and_restarts_queue() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let first = unit.enqueue(request(1, 1, 20, 1), Tick(0), &cfg).unwrap();
        unit.enqueue(request(2, 2, 3, 1), Tick(0), &cfg).unwrap();

        // Pickup at floor 1 succeeds, the dropoff leg faults.
        let mut at = first;
        let err = loop {
            let t = at.unwrap();
            match unit.on_wake(t, &cfg) {
                Ok(step) => at = step.next_wake,
                Err(e) => break (t, e),
            }
        };
        assert!(matches!(err.1, UnitError::FloorOutOfRange { floor: 20, .. }));

        let recovery = unit.recover_from_fault(err.0, &cfg);
        assert_eq!(recovery.dropped.len(), 1);
        assert_eq!(recovery.dropped[0].id, RequestId(1));
        assert!(unit.is_busy());
        assert_eq!(unit.queue_len(), 1);

        let (_, events) = drive(&mut unit, recovery.next_wake, &cfg);
        assert!(matches!(&events[0], UnitEvent::Completed(c) if c.request.id == RequestId(2)));
        assert!(unit.phase().is_idle());
    }

    #[test]
    fn fault_after_completion_keeps_the_completion() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 0, Tick(0));
        let first = unit.enqueue(request(1, 1, 2, 1), Tick(0), &cfg).unwrap();
        unit.enqueue(request(2, 15, 3, 1), Tick(0), &cfg).unwrap();

        let mut at = first;
        let mut seen = None;
        while let Some(t) = at {
            let step = unit.on_wake(t, &cfg).unwrap();
            if step.event.is_some() {
                seen = Some(step.clone());
            }
            at = step.next_wake;
        }
        let step = seen.unwrap();
        assert!(matches!(step.event, Some(UnitEvent::Completed(_))));
        assert_eq!(step.dropped.len(), 1);
        assert_eq!(step.dropped[0].id, RequestId(2));
        assert!(!unit.is_busy());
        assert_eq!(unit.counters().served, 1);
    }

    #[test]
    fn recovery_of_idle_unit_is_a_no_op() {
        let cfg = cfg();
        let mut unit = Unit::new(UnitId(0), 3, Tick(0));
        let recovery = unit.recover_from_fault(Tick(10), &cfg);
        assert!(recovery.dropped.is_empty());
        assert_eq!(recovery.next_wake, None);
        assert_eq!(unit.phase(), UnitPhase::Idle);
        assert!(!unit.is_busy());
    }
}
