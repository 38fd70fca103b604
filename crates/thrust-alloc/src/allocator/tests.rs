use std::f64::consts::PI;

use nalgebra::Vector2;

use super::*;
use crate::constraint::SectorConstraint;
use crate::error::AllocationError;

const TOL: f64 = 1e-3;

fn assert_close(got: f64, want: f64, tol: f64) {
    assert!(
        (got - want).abs() <= tol,
        "got {got}, want {want} (tol {tol})"
    );
}

fn assert_vec_close(got: &DVector<f64>, want: &[f64], tol: f64) {
    assert_eq!(got.len(), want.len(), "length mismatch: {got} vs {want:?}");
    for (g, w) in got.iter().zip(want) {
        assert_close(*g, *w, tol);
    }
}

fn induced_wrench(force: &DVector<f64>, positions: &[Vector2<f64>]) -> Wrench {
    let mut fx = 0.0;
    let mut fy = 0.0;
    let mut mz = 0.0;
    for (i, pos) in positions.iter().enumerate() {
        let (fx_i, fy_i) = (force[2 * i], force[2 * i + 1]);
        fx += fx_i;
        fy += fy_i;
        mz += pos.x * fy_i - pos.y * fx_i;
    }
    Wrench { fx, fy, mz }
}

#[test]
fn twin_stern_azimuths_symmetric_lateral_demand() {
    let mut alloc = Allocator::new();
    let positions = [Vector2::new(-20.0, 5.0), Vector2::new(-20.0, -5.0)];
    for p in positions {
        alloc.add_thruster(Thruster::azimuth(p, 10000.0, 32).unwrap());
    }

    let (force, _) = alloc.allocate((0.0, 500.0, 8000.0), false).unwrap();
    assert_vec_close(&force, &[-1800.0, 250.0, 1800.0, 250.0], 5.0);

    let wrench = induced_wrench(&force, &positions);
    assert_close(wrench.fx, 0.0, TOL * 100.0);
    assert_close(wrench.fy, 500.0, TOL * 100.0);
    assert_close(wrench.mz, 8000.0, TOL * 100.0);
}

#[test]
fn relaxed_solve_has_zero_slack_when_unneeded() {
    // Scenario 1's demand is feasible without slack; the relaxed solver
    // must still drive the slack components to ~0.
    let mut alloc = Allocator::new();
    let positions = [Vector2::new(-20.0, 5.0), Vector2::new(-20.0, -5.0)];
    for p in positions {
        alloc.add_thruster(Thruster::azimuth(p, 10000.0, 32).unwrap());
    }

    let (force, result) = alloc.allocate((0.0, 500.0, 8000.0), true).unwrap();
    assert_vec_close(&force, &[-1800.0, 250.0, 1800.0, 250.0], 5.0);
    let n = force.len();
    let slack = result.x.rows(n, 3).into_owned();
    assert_vec_close(&slack, &[0.0, 0.0, 0.0], TOL);
}

#[test]
fn same_config_infeasible_demand_without_slack_then_relaxed() {
    let mut alloc = Allocator::new();
    let positions = [Vector2::new(-20.0, 5.0), Vector2::new(-20.0, -5.0)];
    for p in positions {
        alloc.add_thruster(Thruster::azimuth(p, 10000.0, 32).unwrap());
    }

    let err = alloc.allocate((25000.0, 0.0, 0.0), false).unwrap_err();
    assert!(matches!(err, AllocationError::Infeasible { .. }));

    let (force, result) = alloc.allocate((25000.0, 0.0, 0.0), true).unwrap();
    assert_vec_close(&force, &[10000.0, 0.0, 10000.0, 0.0], 5.0);
    let n = force.len();
    let slack = result.x.rows(n, 3).into_owned();
    assert_vec_close(&slack, &[5000.0, 0.0, 0.0], 5.0);
}

#[test]
fn azimuth_aft_and_transverse_bow_thruster() {
    let mut alloc = Allocator::new();
    let positions = [Vector2::new(-20.0, 0.0), Vector2::new(20.0, 0.0)];
    alloc.add_thruster(Thruster::azimuth(positions[0], 10000.0, 32).unwrap());
    alloc.add_thruster(Thruster::transverse(positions[1], 1000.0));

    let (force, _) = alloc.allocate((0.0, 500.0, 8000.0), false).unwrap();
    assert_vec_close(&force, &[0.0, 50.0, 0.0, 450.0], 5.0);
}

#[test]
fn demand_marginally_exceeding_transverse_capability() {
    let mut alloc = Allocator::new();
    let positions = [Vector2::new(-20.0, 0.0), Vector2::new(20.0, 0.0)];
    alloc.add_thruster(Thruster::azimuth(positions[0], 10000.0, 32).unwrap());
    alloc.add_thruster(Thruster::transverse(positions[1], 1000.0));

    let err = alloc.allocate((0.0, 2002.0, 0.0), false).unwrap_err();
    assert!(matches!(err, AllocationError::Infeasible { .. }));

    let (force, result) = alloc.allocate((0.0, 2002.0, 0.0), true).unwrap();
    assert_vec_close(&force, &[0.0, 1000.0, 0.0, 1000.0], 5.0);
    let n = force.len();
    let slack = result.x.rows(n, 3).into_owned();
    assert_vec_close(&slack, &[0.0, 2.0, 0.0], 5.0);
}

#[test]
fn disjunct_selection_picks_the_sector_containing_positive_fy() {
    let mut thruster = Thruster::new(Vector2::new(0.0, 0.0));
    let near_zero = SectorConstraint::new(1000.0, 350.0_f64.to_radians(), 10.0_f64.to_radians(), 16)
        .expect("delta under pi");
    let near_ninety =
        SectorConstraint::new(1000.0, 80.0_f64.to_radians(), 100.0_f64.to_radians(), 16)
            .expect("delta under pi");
    thruster.add_disjunct(near_zero);
    thruster.add_disjunct(near_ninety);

    let mut alloc = Allocator::new();
    alloc.add_thruster(thruster);

    let (force, result) = alloc.allocate((0.0, 500.0, 0.0), false).unwrap();
    assert_eq!(result.combination, vec![1]);
    assert!(force[1] > 0.0, "Fy component should be positive: {force}");
}

#[test]
fn sector_exactly_pi_is_accepted_and_past_pi_fails() {
    assert!(SectorConstraint::new(1.0, 0.0, PI, 8).is_ok());
    assert!(SectorConstraint::new(1.0, 0.0, PI + 0.01, 8).is_err());
}

#[test]
fn axis_aligned_segment_constraint_shape() {
    let block = crate::constraint::Constraint1D::new(Vector2::new(-1.0, 0.0), Vector2::new(1.0, 0.0));
    assert_eq!(block.rows(), 3);
    assert_eq!(block.n_eq, 1);
    assert_close(block.b[0], 0.0, 1e-12);
    assert_close(block.b[1], -1.0, 1e-12);
    assert_close(block.b[2], -1.0, 1e-12);
}

#[test]
fn allocate_with_no_thrusters_fails() {
    let alloc = Allocator::new();
    let err = alloc.allocate((0.0, 0.0, 0.0), false).unwrap_err();
    assert!(matches!(err, AllocationError::NoThrusters));
}

#[test]
fn returned_force_vector_length_is_always_two_n() {
    let mut alloc = Allocator::new();
    for i in 0..3 {
        alloc.add_thruster(
            Thruster::azimuth(Vector2::new(i as f64 * 5.0, 0.0), 1000.0, 16).unwrap(),
        );
    }
    let (force, _) = alloc.allocate((0.0, 0.0, 0.0), false).unwrap();
    assert_eq!(force.len(), 6);

    let (force_relaxed, _) = alloc.allocate((0.0, 0.0, 0.0), true).unwrap();
    assert_eq!(force_relaxed.len(), 6);
}
