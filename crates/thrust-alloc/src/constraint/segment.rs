//! `Constraint1D`: the linearized constraint block for a line segment.
//!
//! Why this design
//! - The source (`quota.constraints.Constraint1D`) picks its three branches by
//!   comparing `angle / pi == angle // pi` (integer-exact float comparison on
//!   an `atan2` result). Per the redesign notes this crate instead reads the
//!   axis-aligned cases directly off the direction vector `(dx, dy)` with an
//!   epsilon test, avoiding the `atan2` round-trip entirely.
//! - Bounds always use `min`/`max` of the endpoint coordinates, unifying the
//!   axis-aligned and oblique branches (the source only does this in the
//!   oblique branch).
//!
//! References
//! - quota/constraints.py: `Constraint1D._linearized_constraint`

use nalgebra::{DMatrix, DVector, Vector2};

use super::block::ConstraintBlock;

const AXIS_EPS: f64 = 1e-12;

/// A closed line segment, linearized as an equality line plus end-cap bounds.
pub struct Constraint1D;

impl Constraint1D {
    /// Build the constraint block for the closed segment `p0`–`p1`.
    ///
    /// - Segment parallel to the x-axis (`|dy| <= eps`): one equality
    ///   `y = 0` plus the two x-bounds. Shape 3×2, `n_eq = 1`.
    /// - Segment parallel to the y-axis (`|dx| <= eps`): symmetric. Shape
    ///   3×2, `n_eq = 1`.
    /// - Otherwise: one collinearity equality plus the segment's
    ///   axis-aligned bounding box. Shape 5×2, `n_eq = 1`.
    ///
    /// A degenerate segment (`p0 == p1`) falls into the x-aligned branch
    /// (`dy == 0` trivially holds), producing a point constraint pinned to
    /// `y = 0`, `x = p0.x`.
    pub fn new(p0: Vector2<f64>, p1: Vector2<f64>) -> ConstraintBlock {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;

        if dy.abs() <= AXIS_EPS {
            let mut c = DMatrix::zeros(3, 2);
            let mut b = DVector::zeros(3);
            c[(0, 1)] = 1.0;
            b[0] = 0.0;
            c[(1, 0)] = 1.0;
            b[1] = p0.x.min(p1.x);
            c[(2, 0)] = -1.0;
            b[2] = -p0.x.max(p1.x);
            return ConstraintBlock::new(c, b, 1);
        }

        if dx.abs() <= AXIS_EPS {
            let mut c = DMatrix::zeros(3, 2);
            let mut b = DVector::zeros(3);
            c[(0, 0)] = 1.0;
            b[0] = 0.0;
            c[(1, 1)] = 1.0;
            b[1] = p0.y.min(p1.y);
            c[(2, 1)] = -1.0;
            b[2] = -p0.y.max(p1.y);
            return ConstraintBlock::new(c, b, 1);
        }

        let mut c = DMatrix::zeros(5, 2);
        let mut b = DVector::zeros(5);

        // Collinearity: x_c * x + y_c * y = b_c, with x_c = -(dy/dx), y_c = 1.
        let x_c = -(dy / dx);
        let b_c = p1.y + x_c * p1.x;
        c[(0, 0)] = x_c;
        c[(0, 1)] = 1.0;
        b[0] = b_c;

        c[(1, 0)] = 1.0;
        b[1] = p0.x.min(p1.x);
        c[(2, 1)] = 1.0;
        b[2] = p0.y.min(p1.y);
        c[(3, 0)] = -1.0;
        b[3] = -p0.x.max(p1.x);
        c[(4, 1)] = -1.0;
        b[4] = -p0.y.max(p1.y);

        ConstraintBlock::new(c, b, 1)
    }
}
