//! Dense QP primitive, adapted onto the `clarabel` interior-point conic
//! solver.
//!
//! The allocator only ever sees the dense, Goldfarb–Idnani-style contract
//! from the problem domain: minimize `½xᵀGx + aᵀx` subject to a constraint
//! matrix `C` (column-per-constraint) where the first `n_eq` columns are
//! equalities `Cᵢᵀx = bᵢ` and the rest are inequalities `Cᵢᵀx ≥ bᵢ`. This
//! module is the only place that knows `clarabel` exists.
//!
//! References
//! - ConvexFX's `convexfx-solver/src/osqp_backend.rs` adapts the same kind
//!   of dense QP convention onto `clarabel`'s cone API; this module follows
//!   that shape (dense-to-CSC conversion, `Ax + s = b, s ∈ K` cone split).

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use nalgebra::{DMatrix, DVector};
use std::fmt;

/// The optimal point, objective value, and (if available) dual variables
/// for a single disjunct combination's QP solve.
#[derive(Clone, Debug)]
pub struct QpSolution {
    pub x: DVector<f64>,
    pub objective: f64,
    pub duals: Option<DVector<f64>>,
}

/// Why a single combination's QP solve didn't produce a usable point.
///
/// Per §7, this is never surfaced to the caller of `Allocator::allocate` —
/// it is swallowed into a `tracing::warn!` diagnostic and the enumeration
/// continues to the next combination.
#[derive(Debug)]
pub enum QpError {
    Infeasible,
    Solver(String),
}

impl fmt::Display for QpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infeasible => write!(f, "QP is infeasible for this constraint combination"),
            Self::Solver(msg) => write!(f, "QP solver did not converge: {msg}"),
        }
    }
}

impl std::error::Error for QpError {}

/// Solve `minimize 1/2 x'Gx + a'x` subject to `C` (column-per-constraint,
/// first `n_eq` columns equalities `Cᵢᵀx = bᵢ`, the rest inequalities
/// `Cᵢᵀx ≥ bᵢ`).
pub fn solve_qp(
    g: &DMatrix<f64>,
    a: &DVector<f64>,
    c: &DMatrix<f64>,
    b: &DVector<f64>,
    n_eq: usize,
) -> Result<QpSolution, QpError> {
    let k = g.nrows();
    let m = c.ncols();
    debug_assert_eq!(c.nrows(), k, "C must have one row per variable");
    debug_assert_eq!(b.len(), m, "b must have one entry per constraint");

    let p_csc = dense_to_csc_upper(g);
    let q: Vec<f64> = a.iter().copied().collect();

    // clarabel solves Ax + s = b, s ∈ K. Equality constraint i (Cᵢᵀx = bᵢ)
    // maps directly: row = Cᵢᵀ, rhs = bᵢ, zero cone. Inequality constraint i
    // (Cᵢᵀx ≥ bᵢ) is rewritten -Cᵢᵀx ≤ -bᵢ, i.e. row = -Cᵢᵀ, rhs = -bᵢ,
    // nonnegative cone.
    let mut a_rows = DMatrix::zeros(m, k);
    let mut rhs = vec![0.0; m];
    for j in 0..m {
        let col = c.column(j);
        if j < n_eq {
            for i in 0..k {
                a_rows[(j, i)] = col[i];
            }
            rhs[j] = b[j];
        } else {
            for i in 0..k {
                a_rows[(j, i)] = -col[i];
            }
            rhs[j] = -b[j];
        }
    }
    let a_csc = dense_to_csc_full(&a_rows);

    let mut cones: Vec<SupportedConeT<f64>> = Vec::new();
    if n_eq > 0 {
        cones.push(SupportedConeT::ZeroConeT(n_eq));
    }
    if m > n_eq {
        cones.push(SupportedConeT::NonnegativeConeT(m - n_eq));
    }

    let settings = DefaultSettings {
        verbose: false,
        ..DefaultSettings::default()
    };

    let mut solver = DefaultSolver::new(&p_csc, &q, &a_csc, &rhs, &cones, settings);
    solver.solve();

    match solver.solution.status {
        SolverStatus::Solved | SolverStatus::AlmostSolved => Ok(QpSolution {
            x: DVector::from_vec(solver.solution.x.clone()),
            objective: solver.solution.obj_val,
            duals: Some(DVector::from_vec(solver.solution.z.clone())),
        }),
        SolverStatus::PrimalInfeasible
        | SolverStatus::DualInfeasible
        | SolverStatus::AlmostPrimalInfeasible
        | SolverStatus::AlmostDualInfeasible => Err(QpError::Infeasible),
        other => Err(QpError::Solver(format!("{other:?}"))),
    }
}

fn dense_to_csc_upper(mat: &DMatrix<f64>) -> CscMatrix<f64> {
    let mut colptr = vec![0];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    const EPS: f64 = 1e-14;

    for col in 0..mat.ncols() {
        for row in 0..=col {
            let val = mat[(row, col)];
            if val.abs() > EPS {
                rowval.push(row);
                nzval.push(val);
            }
        }
        colptr.push(nzval.len());
    }

    CscMatrix {
        m: mat.nrows(),
        n: mat.ncols(),
        colptr,
        rowval,
        nzval,
    }
}

fn dense_to_csc_full(mat: &DMatrix<f64>) -> CscMatrix<f64> {
    let mut colptr = vec![0];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    const EPS: f64 = 1e-14;

    for col in 0..mat.ncols() {
        for row in 0..mat.nrows() {
            let val = mat[(row, col)];
            if val.abs() > EPS {
                rowval.push(row);
                nzval.push(val);
            }
        }
        colptr.push(nzval.len());
    }

    CscMatrix {
        m: mat.nrows(),
        n: mat.ncols(),
        colptr,
        rowval,
        nzval,
    }
}
