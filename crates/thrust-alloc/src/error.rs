//! Crate-wide error taxonomy.
//!
//! Follows the hand-rolled `Display`/`Error` pattern used throughout this
//! crate (see `geom4::volume::VolumeError`, `rand4::GeneratorError`) rather
//! than pulling in a derive-macro crate.

use std::fmt;

/// Errors raised while constructing a linearized constraint block.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintError {
    /// A requested region is not convex (e.g. a sector spanning more than π).
    ConvexError { reason: String },
    /// `pad` was asked to grow a block to a width narrower than its current
    /// column count plus the requested left padding.
    PaddingError { current_width: usize, left: usize, total: usize },
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConvexError { reason } => write!(f, "non-convex constraint: {reason}"),
            Self::PaddingError { current_width, left, total } => write!(
                f,
                "padded size {total} is smaller than current width {current_width} + left padding {left}"
            ),
        }
    }
}

impl std::error::Error for ConstraintError {}

/// Errors raised while allocating a wrench across thrusters.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// `allocate` was called with zero thrusters attached.
    NoThrusters,
    /// Every disjunct combination was infeasible for the QP solver.
    Infeasible { combinations_tried: usize },
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoThrusters => write!(
                f,
                "at least one thruster must be added before calling allocate"
            ),
            Self::Infeasible { combinations_tried } => write!(
                f,
                "no feasible solution among {combinations_tried} disjunct combination(s); try relax = true"
            ),
        }
    }
}

impl std::error::Error for AllocationError {}
