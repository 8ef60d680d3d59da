use std::f64::consts::{FRAC_PI_2, PI, TAU};

use slingshot::common::vector;
use slingshot::flyby::geometry::NODE_LINE_EPSILON;
use slingshot::flyby::{
    self, FlybyError, FlybySolver, InfeasibleReason, NewtonBisection, RootFindError,
    TurnAngleResidual,
};

const MU_MARS: f64 = 42_828.37; // km^3 / s^2
const MU_JUPITER: f64 = 126_686_534.0; // km^3 / s^2

fn rotated_xy(speed: f64, angle_rad: f64) -> [f64; 3] {
    [speed * angle_rad.cos(), speed * angle_rad.sin(), 0.0]
}

fn averaged_turn(solution: &flyby::FlybySolution) -> f64 {
    let half = |e: f64| (1.0 / e).asin();
    half(solution.incoming.eccentricity) + half(solution.outgoing.eccentricity)
}

#[test]
fn symmetric_flyby_matches_closed_form_pericenter() {
    // Equal speeds and a 60° turn need e = 2 on both branches, i.e. rp = mu / v².
    let vm = [5.0, 0.0, 0.0];
    let vp = rotated_xy(5.0, 60f64.to_radians());
    let solution = flyby::solve(&vm, &vp, MU_MARS, None).expect("flyby");

    let expected_rp = MU_MARS / 25.0;
    assert!(
        (solution.pericenter_radius_km - expected_rp).abs() < 1e-6 * expected_rp,
        "rp = {}",
        solution.pericenter_radius_km
    );
    assert!((solution.incoming.eccentricity - 2.0).abs() < 1e-9);
    assert!((solution.outgoing.eccentricity - 2.0).abs() < 1e-9);
    assert!(solution.pericenter_impulse_km_s.abs() < 1e-9);
    assert!((solution.vinf_delta_km_s - 5.0).abs() < 1e-9);
}

#[test]
fn asymmetric_flyby_hits_the_turn_angle() {
    let vm = [4.0, 0.5, -0.3];
    let vp = [-1.5, 5.2, 0.8];
    let solution = flyby::solve(&vm, &vp, MU_MARS, None).expect("flyby");

    let turn = vector::angle_between(&vm, &vp);
    assert!((solution.turn_angle_rad - turn).abs() < 1e-12);
    assert!(
        (averaged_turn(&solution) - turn).abs() < 1e-9,
        "averaged turn {} vs {}",
        averaged_turn(&solution),
        turn
    );
    assert!(solution.incoming.eccentricity > 1.0);
    assert!(solution.outgoing.eccentricity > 1.0);
    assert!(solution.incoming.semi_major_axis_km < 0.0);
    assert!(solution.outgoing.semi_major_axis_km < 0.0);
    assert!(solution.pericenter_radius_km > 0.0);

    // Faster outgoing branch: the burn is prograde and its size follows from vis-viva.
    let rp = solution.pericenter_radius_km;
    let vp_minus = (vector::norm(&vm).powi(2) + 2.0 * MU_MARS / rp).sqrt();
    let vp_plus = (vector::norm(&vp).powi(2) + 2.0 * MU_MARS / rp).sqrt();
    assert!(solution.pericenter_impulse_signed_km_s > 0.0);
    assert!((solution.pericenter_impulse_km_s - (vp_plus - vp_minus)).abs() < 1e-9);
    assert!(
        (solution.vinf_delta_km_s - vector::norm(&vector::sub(&vp, &vm))).abs() < 1e-12
    );
}

#[test]
fn safe_radius_gates_feasibility() {
    let vm = [6.0, 0.0, 0.0];
    let vp = rotated_xy(6.5, 20f64.to_radians());
    let free = flyby::solve(&vm, &vp, MU_MARS, None).expect("unconstrained flyby");
    let rp = free.pericenter_radius_km;

    let below = flyby::solve(&vm, &vp, MU_MARS, Some(0.9 * rp)).expect("limit below rp");
    assert!((below.pericenter_radius_km - rp).abs() < 1e-9 * rp);
    assert!((below.pericenter_impulse_km_s - free.pericenter_impulse_km_s).abs() < 1e-12);

    for limit in [rp, 1.1 * rp] {
        match flyby::solve(&vm, &vp, MU_MARS, Some(limit)) {
            Err(FlybyError::InfeasibleGeometry {
                reason: InfeasibleReason::BelowSafeRadius { rp_km, limit_km },
            }) => {
                assert!((rp_km - rp).abs() < 1e-9 * rp);
                assert_eq!(limit_km, limit);
            }
            other => panic!("expected BelowSafeRadius for limit {limit}, got {other:?}"),
        }
    }
}

#[test]
fn swapping_asymptotes_mirrors_the_solution() {
    let vm = [3.0, 1.0, 0.0];
    let vp = [0.5, 4.5, 0.0];
    let forward = flyby::solve(&vm, &vp, MU_JUPITER, None).expect("forward");
    let reverse = flyby::solve(&vp, &vm, MU_JUPITER, None).expect("reverse");

    assert!((forward.turn_angle_rad - reverse.turn_angle_rad).abs() < 1e-12);
    let rp = forward.pericenter_radius_km;
    assert!((forward.pericenter_radius_km - reverse.pericenter_radius_km).abs() < 1e-9 * rp);
    assert!((forward.pericenter_impulse_km_s - reverse.pericenter_impulse_km_s).abs() < 1e-9);
    assert!(
        (forward.pericenter_impulse_signed_km_s + reverse.pericenter_impulse_signed_km_s).abs()
            < 1e-9
    );
    assert!((forward.incoming.eccentricity - reverse.outgoing.eccentricity).abs() < 1e-9);
    assert!((forward.outgoing.eccentricity - reverse.incoming.eccentricity).abs() < 1e-9);
}

#[test]
fn parallel_asymptotes_are_infeasible() {
    let vm = [5.0, 0.0, 0.0];
    let vp = [7.0, 0.0, 0.0];
    match flyby::solve(&vm, &vp, MU_MARS, None) {
        Err(FlybyError::InfeasibleGeometry {
            reason: InfeasibleReason::NoBracket { turn_angle_rad },
        }) => assert_eq!(turn_angle_rad, 0.0),
        other => panic!("expected NoBracket, got {other:?}"),
    }
}

#[test]
fn antiparallel_asymptotes_are_infeasible() {
    let vm = [5.0, 0.0, 0.0];
    let vp = [-5.0, 0.0, 0.0];
    let err = flyby::solve(&vm, &vp, MU_MARS, None).expect_err("reversal");
    assert_eq!(
        err,
        FlybyError::InfeasibleGeometry {
            reason: InfeasibleReason::Reversal
        }
    );
}

#[test]
fn invalid_inputs_are_rejected() {
    let v = [5.0, 0.0, 0.0];
    let zero = [0.0, 0.0, 0.0];
    assert!(matches!(
        flyby::solve(&v, &zero, MU_MARS, None),
        Err(FlybyError::InvalidInput(_))
    ));
    assert!(matches!(
        flyby::solve(&[f64::NAN, 1.0, 0.0], &v, MU_MARS, None),
        Err(FlybyError::InvalidInput(_))
    ));
    assert!(matches!(
        flyby::solve(&v, &[0.0, 5.0, 0.0], 0.0, None),
        Err(FlybyError::InvalidInput(_))
    ));
}

#[test]
fn coplanar_flyby_collapses_node_angles() {
    // Counter-clockwise turn: normal along +z, i = 0.
    let vm = [5.0, 0.0, 0.0];
    let ccw = flyby::solve(&vm, &rotated_xy(5.5, 0.4), MU_MARS, None).expect("ccw");
    assert!(ccw.plane.inclination_rad.abs() < 1e-7);
    assert_eq!(ccw.plane.raan_rad, 0.0);
    assert_eq!(ccw.plane.arg_periapsis_rad, 0.0);

    // Clockwise turn: normal along -z, i = π.
    let cw = flyby::solve(&vm, &rotated_xy(5.5, -0.4), MU_MARS, None).expect("cw");
    assert!((cw.plane.inclination_rad - PI).abs() < 1e-7);
    assert_eq!(cw.plane.raan_rad, 0.0);
    assert_eq!(cw.plane.arg_periapsis_rad, 0.0);

    // Out-of-plane components just below and above the node-line cutoff.
    let [vx, vy, _] = rotated_xy(5.5, 0.4);
    for tilt in [1e-13, 1e-10] {
        let vp = [vx, vy, vy * tilt];
        let tilted = flyby::solve(&vm, &vp, MU_MARS, None).expect("tilted");
        let plane = tilted.plane;
        for angle in [plane.inclination_rad, plane.raan_rad, plane.arg_periapsis_rad] {
            assert!(angle.is_finite(), "tilt {tilt}: {plane:?}");
            assert!((0.0..TAU).contains(&angle), "tilt {tilt}: angle {angle} outside [0, 2π)");
        }
        if tilt < NODE_LINE_EPSILON {
            assert_eq!((plane.raan_rad, plane.arg_periapsis_rad), (0.0, 0.0));
        }
    }
}

#[test]
fn polar_and_near_polar_planes_stay_finite() {
    let vm = [5.0, 0.0, 0.0];
    let polar = flyby::solve(&vm, &[4.0, 0.0, 3.0], MU_MARS, None).expect("polar");
    assert!((polar.plane.inclination_rad - FRAC_PI_2).abs() < 1e-12);

    let near = flyby::solve(&vm, &[4.0, 1e-9, 3.0], MU_MARS, None).expect("near polar");
    for plane in [polar.plane, near.plane] {
        for angle in [plane.inclination_rad, plane.raan_rad, plane.arg_periapsis_rad] {
            assert!(angle.is_finite());
            assert!((0.0..TAU).contains(&angle), "angle {angle} outside [0, 2π)");
        }
    }
}

#[test]
fn pericenter_geometry_is_consistent() {
    let vm = [4.0, -1.0, 0.5];
    let vp = [2.0, 3.5, 1.0];
    let solution = flyby::solve(&vm, &vp, MU_MARS, None).expect("flyby");
    let plane = &solution.plane;

    assert!((vector::norm(&plane.normal) - 1.0).abs() < 1e-12);
    assert!((vector::norm(&plane.pericenter_direction) - 1.0).abs() < 1e-12);
    assert!(vector::dot(&plane.normal, &plane.pericenter_direction).abs() < 1e-12);
    assert!(
        vector::dot(&plane.pericenter_direction, &plane.pericenter_velocity_direction).abs()
            < 1e-12
    );
    // Angular momentum direction is r × v.
    let h = vector::cross(&plane.pericenter_direction, &plane.pericenter_velocity_direction);
    assert!((vector::dot(&h, &plane.normal) - 1.0).abs() < 1e-12);
    assert!((vector::angle_between(&vm, &plane.pericenter_velocity_direction)
        - 0.5 * solution.incoming.turn_angle_rad)
        .abs()
        < 1e-9);
}

#[test]
fn symmetric_pericenter_faces_away_from_the_velocity_change() {
    let vm = rotated_xy(6.0, 0.3);
    let vp = rotated_xy(6.0, 1.1);
    let solution = flyby::solve(&vm, &vp, MU_MARS, None).expect("flyby");
    let dv_hat = vector::unit(&vector::sub(&vp, &vm)).expect("non-zero");
    assert!((vector::dot(&solution.plane.pericenter_direction, &dv_hat) + 1.0).abs() < 1e-9);
}

#[test]
fn small_iteration_budget_fails_cleanly() {
    let solver = FlybySolver::new(NewtonBisection::new(1e-14, 1e-14, 1), 40);
    let result = solver.solve(&[4.0, 0.5, -0.3], &[-1.5, 5.2, 0.8], MU_MARS, None);
    assert!(matches!(
        result,
        Err(FlybyError::InfeasibleGeometry {
            reason: InfeasibleReason::RootFind(RootFindError::MaxIterations { .. })
        })
    ));
}

#[test]
fn small_bracket_budget_reports_no_bracket() {
    // A 1° turn around Mars at 5 km/s needs rp far beyond mu / v².
    let solver = FlybySolver::new(NewtonBisection::default(), 0);
    let result = solver.solve(&[5.0, 0.0, 0.0], &rotated_xy(5.0, 1f64.to_radians()), MU_MARS, None);
    assert!(matches!(
        result,
        Err(FlybyError::InfeasibleGeometry {
            reason: InfeasibleReason::NoBracket { .. }
        })
    ));
}

#[test]
fn residual_is_monotone_and_guards_non_physical_radii() {
    let residual = TurnAngleResidual::new(5.0, 7.0, MU_MARS, 0.5);
    assert_eq!(residual.value(0.0), flyby::residual::NON_PHYSICAL_RESIDUAL);
    assert_eq!(residual.value(-10.0), flyby::residual::NON_PHYSICAL_RESIDUAL);

    let mut previous = f64::INFINITY;
    for rp in [10.0, 100.0, 1_000.0, 10_000.0, 100_000.0] {
        let (value, derivative) = residual.evaluate(rp);
        assert!(value < previous);
        assert!(derivative < 0.0);
        previous = value;
    }
}

#[test]
fn newton_bisection_finds_simple_roots() {
    let solver = NewtonBisection::default();
    let root = solver
        .find_root(|x| (x * x - 2.0, 2.0 * x), 0.0, 2.0)
        .expect("sqrt 2");
    assert!((root.x - 2f64.sqrt()).abs() < 1e-12);

    let err = solver
        .find_root(|x| (x * x + 1.0, 2.0 * x), -1.0, 1.0)
        .expect_err("no sign change");
    assert!(matches!(err, RootFindError::NotBracketed { .. }));
}
