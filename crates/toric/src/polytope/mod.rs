//! Lattice polytopes given by vertices and facet normals.
//!
//! Purpose
//! - Hold a polytope as the pair (vertices, normals) supplied by the caller and
//!   derive the halfspaces `n·x >= min` from them. No hull computation.
//! - Enumerate lattice points and measure lattice distances to facets; both
//!   feed the toric constructions in `crate::variety` and `crate::divisor`.
//!
//! Conventions
//! - Halfspaces point inward: `n·x >= min` with `min = min_v n·v`.
//! - All arithmetic is exact (`i64`, dot products widened to `i128`); results
//!   that leave `i64` are `ToricError::Overflow`, never a wrap or a panic.
//! - Lattice points come out in lexicographic bounding-box order, first
//!   coordinate slowest. Callers rely on that order to pair points with labels.

mod lattice;
mod types;

pub use lattice::LatticePoints;
pub use types::{ivec, Halfspace, IVec, Polytope};
pub(crate) use types::{checked_dot, tuple_string};
