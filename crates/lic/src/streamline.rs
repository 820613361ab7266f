//! Streamline advection along a vector field.
//!
//! A streamline is traced from a seed pixel by repeatedly stepping to the
//! next grid-cell boundary in the flow direction. The step size is the
//! smaller of the two per-axis boundary-crossing times (a CFL-style substep),
//! so the trace never skips a cell without being evaluated in it. Texture
//! samples along the path are combined with a cosine taper weight that is
//! full at the seed and decays smoothly to zero at the traversal's end.

use flowtex_core::{ScalarField, VectorField};

/// Traversal direction along the vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Along the field.
    Forward,
    /// Against the field.
    Backward,
}

impl Direction {
    /// Sign applied to sampled velocities.
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Contribution weight for the sample `step` cells along a streamline.
///
/// `0.5 * (1 + cos(pi * step / streamlength))`: full weight at the seed,
/// decaying smoothly to zero at the end of the traversal so distant samples
/// fade out instead of cutting off with visible stepping artifacts.
pub fn taper_weight(streamlength: usize, step: usize) -> f64 {
    0.5 * (1.0 + (std::f64::consts::PI * step as f64 / streamlength as f64).cos())
}

/// Traces one streamline from `(start_row, start_col)` and returns the
/// accumulated `(weighted_sum, total_weight)` pair.
///
/// Each step samples the vector field at the current continuous position,
/// advances to the next cell boundary, and accumulates the taper-weighted
/// texture value of the integer cell the streamline occupied *before* the
/// advance. Integration stops early when the sampled velocity vanishes
/// (degenerate region) or, with open boundaries, when the position leaves
/// the domain. With periodic boundaries the position wraps modulo the grid
/// size and the trace continues on the opposite edge.
///
/// A returned `total_weight` of zero means the pixel received no
/// contribution at all.
pub fn advect_streamline(
    vfield: &VectorField,
    sfield_in: &ScalarField,
    start_row: usize,
    start_col: usize,
    direction: Direction,
    streamlength: usize,
    periodic: bool,
) -> (f64, f64) {
    let num_rows = vfield.num_rows() as f64;
    let num_cols = vfield.num_cols() as f64;
    let sign = direction.sign();
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut row = start_row as f64;
    let mut col = start_col as f64;
    for step in 0..streamlength {
        // texture cell occupied before this step's advance
        let row_int = row.floor() as usize;
        let col_int = col.floor() as usize;
        let (mut v_row, mut v_col) = vfield.sample_bilinear(row, col);
        v_row *= sign;
        v_col *= sign;
        // advection has stalled
        if v_row == 0.0 && v_col == 0.0 {
            break;
        }
        let dt_row = boundary_crossing_time(row, v_row);
        let dt_col = boundary_crossing_time(col, v_col);
        let dt = dt_row.min(dt_col);
        row += v_row * dt;
        col += v_col * dt;
        if periodic {
            // a CFL substep moves at most one cell per axis, so one added
            // period suffices; unlike rem_euclid this cannot round up to
            // exactly num_rows for a tiny negative operand
            row = (row + num_rows) % num_rows;
            col = (col + num_cols) % num_cols;
        } else if row < 0.0 || row >= num_rows || col < 0.0 || col >= num_cols {
            // open boundaries: the streamline leaves the domain
            break;
        }
        let weight = taper_weight(streamlength, step);
        weighted_sum += weight * sfield_in.get(row_int, col_int);
        total_weight += weight;
    }
    (weighted_sum, total_weight)
}

/// Parametric time until `position` crosses the next integer cell boundary
/// when moving with `velocity`.
///
/// Infinite for a zero component, so the other axis alone decides the step;
/// both components being zero is handled by the caller before this runs.
fn boundary_crossing_time(position: f64, velocity: f64) -> f64 {
    if velocity > 0.0 {
        (position.floor() + 1.0 - position) / velocity
    } else if velocity < 0.0 {
        (position.ceil() - 1.0 - position) / velocity
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtex_core::Xorshift64;

    /// Sum of taper weights over a full traversal of `streamlength` steps.
    fn full_taper_sum(streamlength: usize) -> f64 {
        (0..streamlength).map(|s| taper_weight(streamlength, s)).sum()
    }

    // -- Taper weight --

    #[test]
    fn taper_weight_is_full_at_seed() {
        assert!((taper_weight(16, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn taper_weight_is_zero_at_streamlength() {
        assert!(taper_weight(16, 16).abs() < 1e-12);
    }

    #[test]
    fn taper_weight_is_half_at_midpoint() {
        assert!((taper_weight(16, 8) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn taper_weight_decreases_monotonically() {
        let streamlength = 20;
        for step in 1..=streamlength {
            assert!(
                taper_weight(streamlength, step) <= taper_weight(streamlength, step - 1),
                "taper increased at step {step}"
            );
        }
    }

    // -- Boundary crossing time --

    #[test]
    fn crossing_time_from_cell_interior_moving_positive() {
        // at 2.25 moving +0.5/cell: boundary at 3.0, dt = 0.75 / 0.5
        let dt = boundary_crossing_time(2.25, 0.5);
        assert!((dt - 1.5).abs() < 1e-12);
    }

    #[test]
    fn crossing_time_from_cell_interior_moving_negative() {
        // at 2.25 moving -0.5/cell: boundary at 2.0 (ceil - 1), dt = 0.25 / 0.5
        let dt = boundary_crossing_time(2.25, -0.5);
        assert!((dt - 0.5).abs() < 1e-12);
    }

    #[test]
    fn crossing_time_from_integer_position_is_one_cell() {
        assert!((boundary_crossing_time(3.0, 1.0) - 1.0).abs() < 1e-12);
        assert!((boundary_crossing_time(3.0, -1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_time_for_zero_velocity_is_infinite() {
        assert!(boundary_crossing_time(2.5, 0.0).is_infinite());
    }

    #[test]
    fn crossing_time_is_always_positive() {
        for &pos in &[0.0, 0.1, 3.999, 7.5] {
            for &vel in &[1.0, -1.0, 0.01, -100.0] {
                let dt = boundary_crossing_time(pos, vel);
                assert!(dt > 0.0, "dt = {dt} for pos {pos}, vel {vel}");
            }
        }
    }

    // -- Advection --

    #[test]
    fn zero_field_accumulates_nothing() {
        let vfield = VectorField::zeros(16, 16).unwrap();
        let sfield = ScalarField::filled(16, 16, 1.0).unwrap();
        let (sum, weight) =
            advect_streamline(&vfield, &sfield, 8, 8, Direction::Forward, 8, true);
        assert_eq!(sum, 0.0);
        assert_eq!(weight, 0.0);
    }

    #[test]
    fn constant_field_periodic_accumulates_full_taper_sum() {
        let streamlength = 10;
        let vfield = VectorField::constant(32, 32, 0.0, 1.0).unwrap();
        let sfield = ScalarField::filled(32, 32, 1.0).unwrap();
        let (sum, weight) =
            advect_streamline(&vfield, &sfield, 16, 16, Direction::Forward, streamlength, true);
        let expected = full_taper_sum(streamlength);
        assert!((weight - expected).abs() < 1e-12, "weight {weight} != {expected}");
        // texture is 1.0 everywhere, so the weighted sum equals the weight
        assert!((sum - expected).abs() < 1e-12);
    }

    #[test]
    fn backward_direction_mirrors_forward_on_constant_field() {
        let vfield = VectorField::constant(32, 32, 0.0, 1.0).unwrap();
        let sfield = ScalarField::filled(32, 32, 0.5).unwrap();
        let fwd = advect_streamline(&vfield, &sfield, 16, 16, Direction::Forward, 8, true);
        let bwd = advect_streamline(&vfield, &sfield, 16, 16, Direction::Backward, 8, true);
        assert!((fwd.0 - bwd.0).abs() < 1e-12);
        assert!((fwd.1 - bwd.1).abs() < 1e-12);
    }

    #[test]
    fn open_boundary_terminates_at_domain_edge() {
        // seed on the last column moving off-grid: the very first advance
        // leaves the domain, so nothing is accumulated
        let vfield = VectorField::constant(16, 16, 0.0, 1.0).unwrap();
        let sfield = ScalarField::filled(16, 16, 1.0).unwrap();
        let (sum, weight) =
            advect_streamline(&vfield, &sfield, 8, 15, Direction::Forward, 8, false);
        assert_eq!(sum, 0.0);
        assert_eq!(weight, 0.0);
    }

    #[test]
    fn open_boundary_weight_is_less_than_periodic_weight_near_edge() {
        let streamlength = 10;
        let vfield = VectorField::constant(32, 32, 0.0, 1.0).unwrap();
        let sfield = ScalarField::filled(32, 32, 1.0).unwrap();
        let (_, w_open) =
            advect_streamline(&vfield, &sfield, 16, 28, Direction::Forward, streamlength, false);
        let (_, w_periodic) =
            advect_streamline(&vfield, &sfield, 16, 28, Direction::Forward, streamlength, true);
        assert!(
            w_open < w_periodic,
            "open-boundary weight {w_open} should trail periodic weight {w_periodic}"
        );
    }

    #[test]
    fn periodic_edge_seed_matches_interior_seed_weight() {
        // with a constant field and periodic wrap, a streamline seeded one
        // cell from the edge re-enters on the opposite side and accumulates
        // exactly as much weight as one seeded mid-domain
        let streamlength = 12;
        let vfield = VectorField::constant(64, 64, 0.0, 1.0).unwrap();
        let sfield = ScalarField::filled(64, 64, 1.0).unwrap();
        let (_, w_edge) =
            advect_streamline(&vfield, &sfield, 32, 63, Direction::Forward, streamlength, true);
        let (_, w_interior) =
            advect_streamline(&vfield, &sfield, 32, 32, Direction::Forward, streamlength, true);
        assert!(
            (w_edge - w_interior).abs() < 1e-12,
            "edge weight {w_edge} != interior weight {w_interior}"
        );
    }

    #[test]
    fn nan_region_halts_advection() {
        let vfield = VectorField::from_fn(16, 16, |_, col| {
            if col >= 8 {
                (f64::NAN, f64::NAN)
            } else {
                (0.0, 1.0)
            }
        })
        .unwrap();
        let sfield = ScalarField::filled(16, 16, 1.0).unwrap();
        let (_, weight) =
            advect_streamline(&vfield, &sfield, 4, 4, Direction::Forward, 10, true);
        // advances from col 4 and stalls when the sample touches the NaN
        // block, well short of the full taper sum
        assert!(weight > 0.0);
        assert!(weight < full_taper_sum(10));
    }

    #[test]
    fn diagonal_field_takes_cfl_substeps() {
        // velocity (1, 2): the column axis crosses first (dt = 0.5), so
        // positions advance by (0.5, 1.0) per step and no cell is skipped
        let vfield = VectorField::constant(32, 32, 1.0, 2.0).unwrap();
        let sfield = ScalarField::filled(32, 32, 1.0).unwrap();
        let streamlength = 6;
        let (_, weight) =
            advect_streamline(&vfield, &sfield, 4, 4, Direction::Forward, streamlength, true);
        assert!((weight - full_taper_sum(streamlength)).abs() < 1e-12);
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn total_weight_never_exceeds_full_taper_sum(
                seed: u64,
                start_row in 0_usize..24,
                start_col in 0_usize..24,
                periodic: bool,
            ) {
                let streamlength = 8;
                let mut rng = Xorshift64::new(seed);
                let sfield = ScalarField::random(24, 24, &mut rng).unwrap();
                let vfield = VectorField::from_fn(24, 24, |row, col| {
                    let a = ((row * 7 + col * 13) % 17) as f64 / 17.0 - 0.5;
                    let b = ((row * 11 + col * 3) % 19) as f64 / 19.0 - 0.5;
                    (a, b)
                }).unwrap();
                let (_, weight) = advect_streamline(
                    &vfield, &sfield, start_row, start_col,
                    Direction::Forward, streamlength, periodic,
                );
                prop_assert!(weight <= full_taper_sum(streamlength) + 1e-12);
                prop_assert!(weight >= 0.0);
            }

            #[test]
            fn weighted_sum_is_bounded_by_weight_times_texture_max(
                seed: u64,
                start_row in 0_usize..24,
                start_col in 0_usize..24,
            ) {
                let mut rng = Xorshift64::new(seed);
                let sfield = ScalarField::random(24, 24, &mut rng).unwrap();
                let vfield = VectorField::constant(24, 24, 0.3, -0.7).unwrap();
                let (sum, weight) = advect_streamline(
                    &vfield, &sfield, start_row, start_col,
                    Direction::Forward, 8, true,
                );
                // texture values are in [0, 1)
                prop_assert!(sum >= 0.0);
                prop_assert!(sum <= weight + 1e-12);
            }
        }
    }
}
