//! Error type shared by polytopes, varieties and divisors.
//!
//! Every variant is an immediate failure at the offending call; the
//! computations are pure, so there is no partial result to recover.

use thiserror::Error;

use crate::algebra::ParseError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ToricError {
    /// Inconsistent input data (dimensions, lengths, empty inputs).
    #[error("invalid construction: {reason}")]
    Construction { reason: String },

    #[error("{section} is not a homogeneous section")]
    NotHomogeneous { section: String },

    #[error("divisor has no associated polytope")]
    MissingPolytope,

    #[error("associated variety has no class map defined")]
    MissingClassMap,

    #[error("{expr} is not a monomial in the variety's indeterminates")]
    NotAMonomial { expr: String },

    #[error("polytope {polytope} contains no lattice points")]
    NoLatticePoints { polytope: String },

    #[error("exponent {exponent} of {indeterminate} is negative")]
    NegativeExponent { indeterminate: String, exponent: i64 },

    #[error("expected {expected} section coefficients, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("invalid lattice point partition: {reason}")]
    Partition { reason: String },

    #[error("the zero section has no degree")]
    ZeroSection,

    #[error("divisors belong to different varieties")]
    VarietyMismatch,

    /// An exponent or lattice coordinate left its integer type.
    #[error("integer overflow in {what}")]
    Overflow { what: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ToricError {
    pub(crate) fn construction(reason: impl Into<String>) -> Self {
        Self::Construction {
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(what: impl Into<String>) -> Self {
        Self::Overflow { what: what.into() }
    }

    pub(crate) fn partition(reason: impl Into<String>) -> Self {
        Self::Partition {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ToricError> = std::result::Result<T, E>;
