//! Unit tests for lift-dispatch.

use lift_core::{BuildingConfig, Request, RequestId, Tick, UnitId};

use crate::{FleetSnapshot, UnitView};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn idle_unit(id: u32, floor: u32) -> UnitView {
    UnitView { id: UnitId(id), floor, busy: false, queue: vec![], last_activity: Tick(0) }
}

fn request(origin: u32, destination: u32, party: u32) -> Request {
    Request::new(RequestId(0), origin, destination, party, Tick(0))
}

/// The default 10-floor building with units idle at 0, 5, and 9.
fn standby_fleet() -> FleetSnapshot {
    FleetSnapshot::new(
        Tick(0),
        100,
        BuildingConfig::default(),
        vec![idle_unit(0, 0), idle_unit(1, 5), idle_unit(2, 9)],
    )
}

// ── Weighted factor ───────────────────────────────────────────────────────────

#[cfg(test)]
mod weighted {
    use lift_core::WeightedFactorWeights;

    use super::*;
    use crate::{DispatchPolicy, Explanation, WeightedFactorPolicy};

    #[test]
    fn nearest_idle_unit_wins() {
        let fleet = standby_fleet();
        let d = WeightedFactorPolicy::default()
            .choose(&fleet, &request(2, 8, 2), &mut ())
            .unwrap();
        assert_eq!(d.unit, UnitId(0));

        let Explanation::WeightedFactor { factors } = &d.explanation else {
            panic!("wrong explanation variant");
        };
        assert_eq!(factors.len(), 3);
        assert!(factors[0].total < factors[1].total);
        assert!(factors[1].total < factors[2].total);
        // distance 2 × 1.5 + party 2 × 2
        assert!((factors[0].total - 7.0).abs() < 1e-9);
        assert!((d.score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn factor_terms_match_weights() {
        let mut fleet = standby_fleet();
        let queued = request(8, 9, 3);
        fleet.units[1].busy = true;
        fleet.units[1].queue = vec![queued, request(9, 0, 1)];

        let policy = WeightedFactorPolicy::default();
        // Unit 1 at floor 5 heading up to 8; new origin 2 is below → mismatch.
        let f = policy.score(&fleet, &fleet.units[1], &request(2, 4, 1));
        assert!((f.distance - 4.5).abs() < 1e-9);
        assert!((f.queue - 6.0).abs() < 1e-9);
        assert!((f.busy - 15.0).abs() < 1e-9);
        assert!((f.party - 2.0).abs() < 1e-9);
        assert!((f.direction - 8.0).abs() < 1e-9);
        assert_eq!(f.idle, 0.0);
        assert!((f.load - 6.0).abs() < 1e-9);
        assert!((f.total - 41.5).abs() < 1e-9);
    }

    #[test]
    fn no_direction_penalty_when_same_side() {
        let mut fleet = standby_fleet();
        fleet.units[1].queue = vec![request(8, 9, 1)];
        let f = WeightedFactorPolicy::default().score(&fleet, &fleet.units[1], &request(7, 2, 1));
        assert_eq!(f.direction, 0.0);
    }

    #[test]
    fn idle_term_never_adds_cost() {
        let mut fleet = standby_fleet();
        fleet.now = Tick(10_000);
        let f = WeightedFactorPolicy::default().score(&fleet, &fleet.units[0], &request(1, 2, 1));
        assert_eq!(f.idle, 0.0);
    }

    #[test]
    fn ties_keep_first_unit() {
        let fleet = FleetSnapshot::new(
            Tick(0),
            100,
            BuildingConfig::default(),
            vec![idle_unit(0, 4), idle_unit(1, 6)],
        );
        let d = WeightedFactorPolicy::default().choose(&fleet, &request(5, 9, 1), &mut ()).unwrap();
        assert_eq!(d.unit, UnitId(0));
    }

    #[test]
    fn deterministic_for_identical_input() {
        let mut fleet = standby_fleet();
        fleet.units[0].busy = true;
        fleet.units[0].queue = vec![request(3, 7, 4)];
        let policy = WeightedFactorPolicy::default();
        let first = policy.choose(&fleet, &request(6, 1, 2), &mut ()).unwrap();
        for _ in 0..10 {
            assert_eq!(policy.choose(&fleet, &request(6, 1, 2), &mut ()).unwrap(), first);
        }
    }

    #[test]
    fn custom_weights_change_choice() {
        // With distance ignored, the busy penalty dominates.
        let mut fleet = standby_fleet();
        fleet.units[0].busy = true;
        let policy = WeightedFactorPolicy::new(WeightedFactorWeights {
            distance: 0.0,
            ..WeightedFactorWeights::default()
        });
        let d = policy.choose(&fleet, &request(1, 3, 1), &mut ()).unwrap();
        assert_eq!(d.unit, UnitId(1));
    }
}

// ── Shortest queue ────────────────────────────────────────────────────────────

#[cfg(test)]
mod shortest_queue {
    use super::*;
    use crate::{DispatchPolicy, ShortestQueuePolicy};

    #[test]
    fn picks_minimum_queue() {
        let mut fleet = standby_fleet();
        fleet.units[0].queue = vec![request(1, 2, 1), request(2, 3, 1)];
        fleet.units[1].queue = vec![request(1, 2, 1)];
        fleet.units[2].queue = vec![request(1, 2, 1), request(2, 3, 1)];
        let d = ShortestQueuePolicy.choose(&fleet, &request(0, 9, 1), &mut ()).unwrap();
        assert_eq!(d.unit, UnitId(1));
        assert_eq!(d.score, 1.0);
        assert!(d.reason().contains("shortest queue"), "{}", d.reason());
    }

    #[test]
    fn ties_keep_first_unit() {
        let fleet = standby_fleet();
        let d = ShortestQueuePolicy.choose(&fleet, &request(9, 0, 1), &mut ()).unwrap();
        assert_eq!(d.unit, UnitId(0));
    }
}

// ── Rotating ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rotating {
    use super::*;
    use crate::{DispatchPolicy, Explanation, RotatingPolicy, RotationCursor};

    #[test]
    fn visits_every_unit_once_in_cyclic_order() {
        let fleet = standby_fleet();
        let mut cursor = RotationCursor::default();
        let picks: Vec<UnitId> = (0..3)
            .map(|_| RotatingPolicy.choose(&fleet, &request(1, 2, 1), &mut cursor).unwrap().unit)
            .collect();
        assert_eq!(picks, vec![UnitId(0), UnitId(1), UnitId(2)]);
    }

    #[test]
    fn wraps_modulo_fleet_size() {
        let fleet = standby_fleet();
        let mut cursor = RotationCursor(Some(UnitId(2)));
        let d = RotatingPolicy.choose(&fleet, &request(1, 2, 1), &mut cursor).unwrap();
        assert_eq!(d.unit, UnitId(0));
        assert_eq!(d.explanation, Explanation::Rotating { previous: Some(UnitId(2)) });
        assert_eq!(cursor, RotationCursor(Some(UnitId(0))));
    }

    #[test]
    fn ignores_load() {
        let mut fleet = standby_fleet();
        fleet.units[0].busy = true;
        fleet.units[0].queue = vec![request(1, 2, 8); 5];
        let d = RotatingPolicy.choose(&fleet, &request(1, 2, 1), &mut RotationCursor::default()).unwrap();
        assert_eq!(d.unit, UnitId(0));
    }
}

// ── Preconditions ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod preconditions {
    use lift_core::RequestError;

    use super::*;
    use crate::{
        DispatchError, DispatchPolicy, RotatingPolicy, RotationCursor, ShortestQueuePolicy,
        WeightedFactorPolicy,
    };

    fn empty_fleet() -> FleetSnapshot {
        FleetSnapshot::new(Tick(0), 100, BuildingConfig::default(), vec![])
    }

    #[test]
    fn empty_fleet_is_rejected_by_every_policy() {
        let fleet = empty_fleet();
        let r = request(1, 2, 1);
        assert_eq!(
            WeightedFactorPolicy::default().choose(&fleet, &r, &mut ()).unwrap_err(),
            DispatchError::EmptyFleet
        );
        assert_eq!(ShortestQueuePolicy.choose(&fleet, &r, &mut ()).unwrap_err(), DispatchError::EmptyFleet);
        let mut cursor = RotationCursor::default();
        assert_eq!(RotatingPolicy.choose(&fleet, &r, &mut cursor).unwrap_err(), DispatchError::EmptyFleet);
        assert_eq!(cursor, RotationCursor(None));
    }

    #[test]
    fn invalid_request_is_rejected() {
        let fleet = standby_fleet();
        let err = WeightedFactorPolicy::default()
            .choose(&fleet, &request(3, 3, 1), &mut ())
            .unwrap_err();
        assert_eq!(err, DispatchError::InvalidRequest(RequestError::SameFloor { floor: 3 }));

        let err = ShortestQueuePolicy.choose(&fleet, &request(1, 3, 0), &mut ()).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidRequest(RequestError::PartySize { .. })));
    }

    #[test]
    fn unit_lookup_is_bounds_checked() {
        let fleet = standby_fleet();
        assert!(fleet.unit(UnitId(2)).is_ok());
        assert_eq!(
            fleet.unit(UnitId(3)).unwrap_err(),
            DispatchError::UnitOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn converts_into_lift_error() {
        let e: lift_core::LiftError = DispatchError::EmptyFleet.into();
        assert!(matches!(e, lift_core::LiftError::InvalidFleetState(_)));
    }
}
