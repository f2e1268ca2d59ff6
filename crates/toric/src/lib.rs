//! Lattice polytopes, complete toric varieties and their divisors.
//!
//! Data flows `Polytope → ToricVariety → ToricDivisor`: a polytope's facet
//! normals fix the variety and its Cox ring indeterminates, sub-polytopes give
//! divisors, and their lattice points give monomial sections. The partition
//! matrix of a few sections feeds an exact determinant for elimination.
//!
//! API Policy
//! - Workspace-internal. Types and signatures change whenever that makes the
//!   computations clearer.
//! - All arithmetic is exact: lattice data is `i64` with checked overflow,
//!   polynomial coefficients are arbitrary precision. No tolerances anywhere.

pub mod algebra;
pub mod divisor;
pub mod error;
pub mod polytope;
pub mod special;
pub mod variety;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use divisor::ToricDivisor;
pub use error::{Result, ToricError};
pub use polytope::{ivec, IVec, Polytope};
pub use variety::{ToricVariety, VarietyCfg};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::algebra::{
        determinant, format_matrix, symbols, IBig, Poly, PolyMatrix, Symbol,
    };
    pub use crate::divisor::ToricDivisor;
    pub use crate::error::{Result, ToricError};
    pub use crate::polytope::{ivec, Halfspace, IVec, Polytope};
    pub use crate::variety::{ToricVariety, VarietyCfg};
}

#[cfg(test)]
mod tests_special;
