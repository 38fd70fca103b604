//! Thruster model: a position plus an ordered, non-empty list of disjunct
//! constraint blocks (the "OR" of the regions the thruster's force may lie
//! in).
//!
//! References
//! - quota/thruster.py, quta/thruster.py

use nalgebra::Vector2;

use crate::constraint::{CircleConstraint, Constraint1D, ConstraintBlock};
use crate::error::ConstraintError;

/// A point-located actuator with one or more disjunct feasible regions.
///
/// Position is immutable once set; disjuncts are appended via
/// [`Thruster::add_disjunct`] during setup and should not change once the
/// thruster is in use by an [`crate::allocator::Allocator`].
#[derive(Clone, Debug)]
pub struct Thruster {
    position: Vector2<f64>,
    disjuncts: Vec<ConstraintBlock>,
}

impl Thruster {
    /// A thruster at `position` with no disjuncts yet. Callers must add at
    /// least one region (via [`Thruster::add_disjunct`] or a convenience
    /// constructor) before the thruster is usable by an allocator.
    pub fn new(position: Vector2<f64>) -> Self {
        Self {
            position,
            disjuncts: Vec::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    #[inline]
    pub fn disjuncts(&self) -> &[ConstraintBlock] {
        &self.disjuncts
    }

    #[inline]
    pub fn disjunct_count(&self) -> usize {
        self.disjuncts.len()
    }

    /// Append a disjunct region. The block must constrain a single
    /// thruster's 2D force (2 columns) — enforced by construction, since
    /// every `ConstraintBlock` produced by this crate's geometry
    /// constructors has exactly 2 columns.
    pub fn add_disjunct(&mut self, block: ConstraintBlock) {
        debug_assert_eq!(block.cols(), 2, "a thruster disjunct must be 2-column");
        self.disjuncts.push(block);
    }

    /// Single-disjunct thruster constrained to the segment `(0,-F)`–`(0,F)`:
    /// force transverse to the vessel's longitudinal axis.
    pub fn transverse(position: Vector2<f64>, max_force: f64) -> Self {
        let mut t = Self::new(position);
        t.add_disjunct(Constraint1D::new(
            Vector2::new(0.0, -max_force),
            Vector2::new(0.0, max_force),
        ));
        t
    }

    /// Single-disjunct thruster constrained to the segment `(-F,0)`–`(F,0)`:
    /// force along the vessel's longitudinal axis.
    pub fn longitudinal(position: Vector2<f64>, max_force: f64) -> Self {
        let mut t = Self::new(position);
        t.add_disjunct(Constraint1D::new(
            Vector2::new(-max_force, 0.0),
            Vector2::new(max_force, 0.0),
        ));
        t
    }

    /// Single-disjunct thruster constrained to a regular `n`-gon disk of
    /// radius `F`, approximating an azimuthing thruster that can push in
    /// any direction. `n` is forced even by rounding down.
    ///
    /// Fails with [`ConstraintError::ConvexError`] when `facets` rounds
    /// down to fewer than 3 edges (`facets` of 0, 1, 2, or 3).
    pub fn azimuth(
        position: Vector2<f64>,
        max_force: f64,
        facets: usize,
    ) -> Result<Self, ConstraintError> {
        let even_facets = (facets / 2) * 2;
        let mut t = Self::new(position);
        let block = CircleConstraint::new(max_force, even_facets)?;
        t.add_disjunct(block);
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transverse_has_single_disjunct() {
        let t = Thruster::transverse(Vector2::new(1.0, 2.0), 100.0);
        assert_eq!(t.disjunct_count(), 1);
        assert_eq!(t.position(), Vector2::new(1.0, 2.0));
    }

    #[test]
    fn longitudinal_has_single_disjunct() {
        let t = Thruster::longitudinal(Vector2::new(0.0, 0.0), 50.0);
        assert_eq!(t.disjunct_count(), 1);
    }

    #[test]
    fn azimuth_rounds_facets_down_to_even() {
        let t = Thruster::azimuth(Vector2::new(0.0, 0.0), 10.0, 33).unwrap();
        // 33 // 2 * 2 = 32
        assert_eq!(t.disjuncts()[0].rows(), 32);
    }

    #[test]
    fn azimuth_fails_when_rounded_facet_count_is_too_small() {
        // facets=3 rounds down to 2, below the minimum of 3.
        assert!(Thruster::azimuth(Vector2::new(0.0, 0.0), 10.0, 3).is_err());
        assert!(Thruster::azimuth(Vector2::new(0.0, 0.0), 10.0, 2).is_err());
        assert!(Thruster::azimuth(Vector2::new(0.0, 0.0), 10.0, 0).is_err());
    }

    #[test]
    fn multi_disjunct_thruster_accumulates_regions() {
        let mut t = Thruster::new(Vector2::new(0.0, 0.0));
        t.add_disjunct(Constraint1D::new(Vector2::new(0.0, -1.0), Vector2::new(0.0, 1.0)));
        t.add_disjunct(Constraint1D::new(Vector2::new(-1.0, 0.0), Vector2::new(1.0, 0.0)));
        assert_eq!(t.disjunct_count(), 2);
    }
}
