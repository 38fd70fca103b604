//! A planar thrust allocation engine.
//!
//! Given a desired global wrench `(F_x, F_y, M_z)` on a rigid body in the
//! plane, [`allocator::Allocator`] distributes it across a fixed set of
//! point-located [`thruster::Thruster`]s, each constrained to its own
//! convex feasible region, by solving a disjunctive quadratic program and
//! returning the globally cheapest feasible combination.
//!
//! Four layers, bottom-up:
//! - [`constraint`]: linearized convex constraint blocks from segment,
//!   polygon, circle, and sector primitives, plus the padding/concatenation
//!   algebra used to place them in a global variable layout.
//! - [`thruster`]: a position plus an ordered, non-empty list of disjunct
//!   constraint blocks.
//! - [`allocator`]: objective assembly, disjunct enumeration, and QP
//!   dispatch.
//! - [`error`]: the crate's error taxonomy.

pub mod allocator;
pub mod constraint;
pub mod error;
pub mod thruster;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for callers assembling an allocation problem.
pub mod prelude {
    pub use crate::allocator::{Allocator, AllocationResult, Wrench};
    pub use crate::constraint::{CircleConstraint, Constraint1D, ConstraintBlock, SectorConstraint};
    pub use crate::error::{AllocationError, ConstraintError};
    pub use crate::thruster::Thruster;
    pub use nalgebra::Vector2;
}
