//! The linear constraint block `(C, b, n_eq)` and its algebra (`pad`, `concat`).
//!
//! Invariants
//! - Equality-prefix: rows `[0, n_eq)` are `Cᵢᵀx = bᵢ`, the rest are `Cᵢᵀx ≥ bᵢ`.
//! - `C` has `b.len()` rows; `n_eq <= b.len()`.
//!
//! References
//! - quota/constraints.py: `concatenate_constraints`, `pad_constraints`

use nalgebra::{DMatrix, DVector};

use crate::error::ConstraintError;

/// A linearized convex constraint block in half-plane canonical form.
///
/// `C` is `m×k` (one row per constraint, `k` variables). Rows `[0, n_eq)`
/// are equalities, the remainder inequalities.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintBlock {
    pub c: DMatrix<f64>,
    pub b: DVector<f64>,
    pub n_eq: usize,
}

impl ConstraintBlock {
    /// Build a block, checking the equality-prefix invariant in debug builds.
    pub fn new(c: DMatrix<f64>, b: DVector<f64>, n_eq: usize) -> Self {
        debug_assert_eq!(c.nrows(), b.len(), "C and b must have matching row count");
        debug_assert!(n_eq <= b.len(), "n_eq cannot exceed the row count");
        Self { c, b, n_eq }
    }

    /// An empty block with zero rows and `cols` columns.
    pub fn empty(cols: usize) -> Self {
        Self {
            c: DMatrix::zeros(0, cols),
            b: DVector::zeros(0),
            n_eq: 0,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.c.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.c.ncols()
    }

    /// Expand the column count from `cols()` to `total` by inserting `left`
    /// filler columns before the block and `total - cols() - left` after.
    ///
    /// Fails with [`ConstraintError::PaddingError`] when there isn't enough
    /// room, i.e. `total < cols() + left`.
    pub fn pad(&self, left: usize, total: usize, fill: f64) -> Result<Self, ConstraintError> {
        let current_width = self.cols();
        if total < current_width + left {
            tracing::warn!(
                current_width,
                left,
                total,
                "rejecting pad: target width too narrow"
            );
            return Err(ConstraintError::PaddingError {
                current_width,
                left,
                total,
            });
        }
        let right = total - current_width - left;
        let mut out = DMatrix::from_element(self.rows(), total, fill);
        out.view_mut((0, left), (self.rows(), current_width))
            .copy_from(&self.c);
        let _ = right; // documents the remaining filler columns; nothing more to fill.
        Ok(Self {
            c: out,
            b: self.b.clone(),
            n_eq: self.n_eq,
        })
    }

    /// Merge two blocks sharing a column count, keeping the equality-prefix
    /// invariant: `self`'s equalities, then `other`'s equalities, then
    /// `self`'s inequalities, then `other`'s inequalities.
    pub fn concat(&self, other: &Self) -> Self {
        debug_assert_eq!(
            self.cols(),
            other.cols(),
            "concat requires matching column counts"
        );
        let cols = self.cols();
        let n0 = self.n_eq;
        let n1 = other.n_eq;
        let total_rows = self.rows() + other.rows();
        let mut c = DMatrix::zeros(total_rows, cols);
        let mut b = DVector::zeros(total_rows);

        // self's equalities [0, n0)
        c.view_mut((0, 0), (n0, cols))
            .copy_from(&self.c.view((0, 0), (n0, cols)));
        b.view_mut((0, 0), (n0, 1))
            .copy_from(&self.b.view((0, 0), (n0, 1)));

        // other's equalities spliced in at n0
        c.view_mut((n0, 0), (n1, cols))
            .copy_from(&other.c.view((0, 0), (n1, cols)));
        b.view_mut((n0, 0), (n1, 1))
            .copy_from(&other.b.view((0, 0), (n1, 1)));

        // self's inequalities
        let self_ineq = self.rows() - n0;
        c.view_mut((n0 + n1, 0), (self_ineq, cols))
            .copy_from(&self.c.view((n0, 0), (self_ineq, cols)));
        b.view_mut((n0 + n1, 0), (self_ineq, 1))
            .copy_from(&self.b.view((n0, 0), (self_ineq, 1)));

        // other's inequalities, appended last
        let other_ineq = other.rows() - n1;
        c.view_mut((n0 + n1 + self_ineq, 0), (other_ineq, cols))
            .copy_from(&other.c.view((n1, 0), (other_ineq, cols)));
        b.view_mut((n0 + n1 + self_ineq, 0), (other_ineq, 1))
            .copy_from(&other.b.view((n1, 0), (other_ineq, 1)));

        Self {
            c,
            b,
            n_eq: n0 + n1,
        }
    }
}
