//! Polygon, circle, and circular-sector constraint blocks.
//!
//! A polygon's boundary is an ordered list of `>= 3` CCW vertices. Each
//! consecutive edge contributes one inequality row; the block returned is
//! the negation of the naive outward-normal form so the interior satisfies
//! `Cᵀx ≥ b`.
//!
//! `Circle` and `Sector` are polygon constructors (inscribed regular n-gon /
//! fan of triangles), not separate subclasses — per the redesign notes.
//!
//! References
//! - quota/constraints.py: `Constraint2D`, `CircleConstraint`, `SectorConstraint`

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector, Vector2};

use super::block::ConstraintBlock;
use crate::error::ConstraintError;

/// Build the linearized constraint block for a convex polygon given its
/// boundary vertices in CCW order. Requires at least 3 vertices.
pub fn polygon(vertices: &[Vector2<f64>]) -> Result<ConstraintBlock, ConstraintError> {
    let n = vertices.len();
    if n < 3 {
        let reason = format!("polygon needs at least 3 vertices, got {n}");
        tracing::warn!(%reason, "rejecting polygon constraint");
        return Err(ConstraintError::ConvexError { reason });
    }

    let mut c = DMatrix::zeros(n, 2);
    let mut b = DVector::zeros(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let (x0, y0) = (vertices[prev].x, vertices[prev].y);
        let (x1, y1) = (vertices[i].x, vertices[i].y);
        c[(i, 0)] = -(y1 - y0);
        c[(i, 1)] = -(x0 - x1);
        b[i] = -(x0 * y1 - x1 * y0);
    }

    Ok(ConstraintBlock::new(c, b, 0))
}

#[inline]
fn point_on_circle(angle: f64, radius: f64) -> Vector2<f64> {
    Vector2::new(radius * angle.cos(), radius * angle.sin())
}

/// Inscribed regular `n`-gon, approximating a disk of radius `r`.
pub struct CircleConstraint;

impl CircleConstraint {
    /// Default facet count when the caller doesn't need a specific value.
    pub const DEFAULT_EDGES: usize = 16;

    /// Build the block for a regular `edges`-gon of radius `r` inscribed in
    /// the circle, first vertex at angle 0. Fails if `edges < 3`.
    pub fn new(radius: f64, edges: usize) -> Result<ConstraintBlock, ConstraintError> {
        if edges < 3 {
            let reason = format!("circle needs at least 3 edges, got {edges}");
            tracing::warn!(%reason, "rejecting circle constraint");
            return Err(ConstraintError::ConvexError { reason });
        }
        let step = 2.0 * PI / edges as f64;
        let points: Vec<Vector2<f64>> = (0..edges)
            .map(|i| point_on_circle(i as f64 * step, radius))
            .collect();
        polygon(&points)
    }
}

/// A circular sector (pie slice), linearized as a fan of triangles.
pub struct SectorConstraint;

impl SectorConstraint {
    /// Default facet count on the arc when the caller doesn't need a
    /// specific value.
    pub const DEFAULT_EDGES: usize = 10;

    /// Build the block for a sector of radius `r` sweeping from angle
    /// `start` to `end` (radians), approximated by `edges` facets on the
    /// arc plus the origin.
    ///
    /// Fails with [`ConstraintError::ConvexError`] when the swept angle
    /// `delta = (end - start) mod 2π` exceeds `π` (the region would be
    /// non-convex).
    pub fn new(
        radius: f64,
        start: f64,
        end: f64,
        edges: usize,
    ) -> Result<ConstraintBlock, ConstraintError> {
        let two_pi = 2.0 * PI;
        let mut delta = (end - start) % two_pi;
        if delta < 0.0 {
            delta += two_pi;
        }
        if delta > PI {
            let reason = format!(
                "sector delta angle is {:.1} deg, greater than 180 deg; reformulate as a convex constraint",
                delta.to_degrees()
            );
            tracing::warn!(%reason, "rejecting sector constraint");
            return Err(ConstraintError::ConvexError { reason });
        }

        // Spec §3 states the arc point count as `ceil(delta * pi / 2 * edges) + 1`,
        // carried forward literally from quota/constraints.py's
        // `ceil(delta / 2 * pi * edges)` even though §9 flags this as
        // dimensionally unusual (the likely intent is `ceil(delta / (2*pi) * edges)`).
        // Not silently "fixed" per the Open Questions note.
        let n_cells = ((delta / 2.0) * PI * edges as f64).ceil().max(1.0) as usize;
        let step_angle = delta / n_cells as f64;

        let mut points = Vec::with_capacity(n_cells + 2);
        points.push(Vector2::new(0.0, 0.0));
        for i in 0..=n_cells {
            points.push(point_on_circle(i as f64 * step_angle + start, radius));
        }

        polygon(&points)
    }
}
