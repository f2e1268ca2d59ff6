//! Minimal symbolic algebra used by the toric constructions.
//!
//! Purpose
//! - Provide exactly what divisors and varieties need from a computer-algebra
//!   system: parse an expression, split a polynomial into coefficients over an
//!   ordered list of indeterminates (and re-split it over another list), and
//!   take exact determinants of polynomial matrices.
//!
//! Conventions
//! - Coefficients are arbitrary-precision integers (`dashu`'s `IBig`); symbolic
//!   coefficients (`a0`, `b3`, ...) are plain symbols and simply stay in the
//!   coefficient part of `coefficients_in`.
//! - Exponents are non-negative `u32`. Laurent monomials are not representable.

mod matrix;
mod parse;
mod poly;
mod symbol;

pub use matrix::{determinant, format_matrix, zeros, PolyMatrix};
pub use parse::ParseError;
pub use dashu::integer::IBig;
pub use poly::{ExponentKey, Monomial, Poly};
pub use symbol::{symbols, Symbol};
