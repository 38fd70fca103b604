//! Disjunctive QP allocator: enumerate every disjunct combination across the
//! attached thrusters, solve the quadratic program for each, and return the
//! cheapest feasible solution.
//!
//! References
//! - quta/allocator.py: `Allocator`, `MinimizePowerAllocator`

mod qp;

pub use qp::{QpError, QpSolution};

use itertools::Itertools;
use nalgebra::{DMatrix, DVector};

use crate::constraint::ConstraintBlock;
use crate::error::AllocationError;
use crate::thruster::Thruster;

const DOFS: usize = 3;

/// The desired global wrench: two planar forces and one moment about the
/// allocator's reference point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wrench {
    pub fx: f64,
    pub fy: f64,
    pub mz: f64,
}

impl From<(f64, f64, f64)> for Wrench {
    fn from((fx, fy, mz): (f64, f64, f64)) -> Self {
        Self { fx, fy, mz }
    }
}

/// The unreduced QP result for a winning combination: objective value, the
/// full solution vector (including slack columns when relaxed), the dual
/// variables if the solver returned them, and which disjunct of each
/// thruster was selected.
#[derive(Clone, Debug)]
pub struct AllocationResult {
    pub objective: f64,
    pub x: DVector<f64>,
    pub duals: Option<DVector<f64>>,
    pub combination: Vec<usize>,
}

/// A planar thrust allocation problem: a fixed set of thrusters and three
/// slack-penalty coefficients, solved independently for each `allocate`
/// call.
#[derive(Clone, Debug)]
pub struct Allocator {
    thrusters: Vec<Thruster>,
    slack_coefficients: (f64, f64, f64),
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator {
    pub fn new() -> Self {
        Self {
            thrusters: Vec::new(),
            slack_coefficients: (1000.0, 1000.0, 1000.0),
        }
    }

    /// Set the per-DOF slack penalty weights `(w_x, w_y, w_m)`, each of
    /// which must be strictly positive.
    pub fn set_slack_coefficients(&mut self, w_x: f64, w_y: f64, w_m: f64) {
        debug_assert!(
            w_x > 0.0 && w_y > 0.0 && w_m > 0.0,
            "slack coefficients must be strictly positive"
        );
        self.slack_coefficients = (w_x, w_y, w_m);
    }

    pub fn add_thruster(&mut self, thruster: Thruster) {
        self.thrusters.push(thruster);
    }

    #[inline]
    pub fn n_thrusters(&self) -> usize {
        self.thrusters.len()
    }

    #[inline]
    fn n_problem(&self) -> usize {
        2 * self.n_thrusters()
    }

    #[inline]
    fn n_relaxed_problem(&self) -> usize {
        self.n_problem() + DOFS
    }

    fn objective(&self, relax: bool) -> (DMatrix<f64>, DVector<f64>) {
        let n = if relax {
            self.n_relaxed_problem()
        } else {
            self.n_problem()
        };
        let mut g = DMatrix::identity(n, n);
        if relax {
            let (w_x, w_y, w_m) = self.slack_coefficients;
            g[(n - 3, n - 3)] = w_x;
            g[(n - 2, n - 2)] = w_y;
            g[(n - 1, n - 1)] = w_m;
        }
        let a = DVector::zeros(n);
        (g, a)
    }

    /// Build the wrench-balance equality rows plus each thruster's selected
    /// disjunct, padded into the global variable layout.
    fn assemble_constraints(
        &self,
        wrench: Wrench,
        relax: bool,
        combination: &[usize],
    ) -> ConstraintBlock {
        let n_problem = self.n_problem();
        let width = if relax { n_problem + DOFS } else { n_problem };

        let mut c = DMatrix::zeros(DOFS, width);
        let b = DVector::from_row_slice(&[wrench.fx, wrench.fy, wrench.mz]);
        for (i, thruster) in self.thrusters.iter().enumerate() {
            let pos = thruster.position();
            let (x, y) = (pos.x, pos.y);
            c[(0, 2 * i)] = 1.0;
            c[(1, 2 * i + 1)] = 1.0;
            c[(2, 2 * i)] = -y;
            c[(2, 2 * i + 1)] = x;
        }
        if relax {
            c[(0, width - 3)] = 1.0;
            c[(1, width - 2)] = 1.0;
            c[(2, width - 1)] = 1.0;
        }

        let mut block = ConstraintBlock::new(c, b, DOFS);

        for (i, (thruster, &disjunct)) in self.thrusters.iter().zip(combination).enumerate() {
            let local = &thruster.disjuncts()[disjunct];
            let padded = local
                .pad(2 * i, width, 0.0)
                .expect("thruster disjuncts are padded within the global width by construction");
            block = block.concat(&padded);
        }

        block
    }

    /// Allocate the desired wrench across the attached thrusters.
    ///
    /// Enumerates the Cartesian product of each thruster's disjuncts in
    /// lexicographic index order, solves a QP per combination, and returns
    /// the force vector (slack hidden) of the combination with the smallest
    /// objective value. Ties are broken by keeping the first (lexically
    /// smallest) combination encountered, since later combinations only
    /// replace the running best on a strictly smaller objective.
    pub fn allocate(
        &self,
        wrench: impl Into<Wrench>,
        relax: bool,
    ) -> Result<(DVector<f64>, AllocationResult), AllocationError> {
        if self.n_thrusters() == 0 {
            return Err(AllocationError::NoThrusters);
        }
        let wrench = wrench.into();

        let (g, a) = self.objective(relax);
        let n_problem = self.n_problem();

        let disjunct_ranges: Vec<Vec<usize>> = self
            .thrusters
            .iter()
            .map(|t| (0..t.disjunct_count()).collect())
            .collect();

        let mut best: Option<AllocationResult> = None;
        let mut tried = 0usize;

        for combination in disjunct_ranges.iter().multi_cartesian_product() {
            let combination: Vec<usize> = combination.into_iter().copied().collect();
            tried += 1;
            let block = self.assemble_constraints(wrench, relax, &combination);
            // The QP primitive's contract is column-per-constraint; our
            // block is built row-per-constraint, so transpose before the call.
            match qp::solve_qp(&g, &a, &block.c.transpose(), &block.b, block.n_eq) {
                Ok(solution) => {
                    let is_better = match &best {
                        Some(current) => solution.objective < current.objective,
                        None => true,
                    };
                    if is_better {
                        tracing::debug!(
                            ?combination,
                            objective = solution.objective,
                            "new best disjunct combination"
                        );
                        best = Some(AllocationResult {
                            objective: solution.objective,
                            x: solution.x,
                            duals: solution.duals,
                            combination,
                        });
                    }
                }
                Err(err) => {
                    tracing::warn!(?combination, %err, "disjunct combination has no solution");
                }
            }
        }

        match best {
            Some(result) => {
                let force = result.x.rows(0, n_problem).into_owned();
                Ok((force, result))
            }
            None => Err(AllocationError::Infeasible {
                combinations_tried: tried,
            }),
        }
    }
}

#[cfg(test)]
mod tests;
