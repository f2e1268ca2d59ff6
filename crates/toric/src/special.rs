//! The worked lifting example used in tests, benches and the CLI.
//!
//! Purpose
//! - A smooth projective 3-fold `X` (seven rays) and the square `P^1 × P^1`
//!   surface `Y` obtained by dropping the ray `(-1, -1, -1)`.
//! - Four divisors on `X`, their counterparts on `Y`, and the lattice point
//!   labelling that turns sections `F_1, F_2, F_3` into a 3×3 matrix whose
//!   determinant eliminates the restricted indeterminates.
//!
//! References
//! - Class of `D_1 + D_2 + D_3` is `(2, 4, 8, 4)`; the determinant carries
//!   exactly this multidegree.

use std::sync::Arc;

use nalgebra::dmatrix;
use rand::Rng;

use crate::algebra::{Poly, PolyMatrix};
use crate::divisor::ToricDivisor;
use crate::error::{Result, ToricError};
use crate::polytope::Polytope;
use crate::variety::{ToricVariety, VarietyCfg};

/// Coefficient prefixes of the generic sections `F_0 .. F_3`.
pub const SECTION_PREFIXES: [&str; 4] = ["a", "b", "c", "d"];

const NORMALS: [[i64; 3]; 7] = [
    [0, 0, 1],
    [0, 0, -1],
    [0, 1, 0],
    [0, -1, 0],
    [-1, -1, -1],
    [1, 0, 0],
    [-1, 0, 0],
];

const SQUARE_NORMALS: [[i64; 2]; 4] = [[0, 1], [0, -1], [1, 0], [-1, 0]];

/// Normals of `X` without `(-1, -1, -1)`.
fn sub_normals() -> Vec<[i64; 3]> {
    NORMALS
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != 4)
        .map(|(_, n)| *n)
        .collect()
}

/// The 3-fold `X`: the cube `[0, 2]^3` with the corner `(2, 2, 2)` cut off.
pub fn threefold() -> Result<Arc<ToricVariety>> {
    let polytope = Polytope::from_rows(
        &[
            [0, 0, 0],
            [2, 0, 0],
            [2, 2, 0],
            [0, 2, 0],
            [0, 0, 2],
            [2, 0, 2],
            [0, 2, 2],
            [2, 2, 1],
            [2, 1, 2],
            [1, 2, 2],
        ],
        &NORMALS,
    )?;
    let class_map = dmatrix![
        1, 1, 0, 0, 0, 0, 0;
        0, 0, 1, 1, 0, 0, 0;
        1, 0, 1, 0, 1, 1, 0;
        0, 0, 0, 0, 0, 1, 1
    ];
    ToricVariety::new(polytope, VarietyCfg::default().with_class_map(class_map))
}

/// `P^1 × P^1` as the unit square. Its indeterminates `X0 .. X3` coincide
/// with the first four of [`threefold`].
pub fn square_surface() -> Result<Arc<ToricVariety>> {
    let polytope = Polytope::from_rows(&[[0, 0], [1, 0], [1, 1], [0, 1]], &SQUARE_NORMALS)?;
    let class_map = dmatrix![
        1, 1, 0, 0;
        0, 0, 1, 1
    ];
    ToricVariety::new(polytope, VarietyCfg::default().with_class_map(class_map))
}

/// Everything the lifting computation needs, built once.
#[derive(Clone, Debug)]
pub struct LiftingExample {
    pub variety: Arc<ToricVariety>,
    pub restricted: Arc<ToricVariety>,
    /// `D_0 .. D_3` on the 3-fold.
    pub divisors: Vec<ToricDivisor>,
    /// Their restrictions to the square.
    pub restricted_divisors: Vec<ToricDivisor>,
    /// Labels for the lattice points of restricted divisors 1..=3.
    pub partition: Vec<Vec<usize>>,
}

pub fn lifting_example() -> Result<LiftingExample> {
    let variety = threefold()?;
    let restricted = square_surface()?;
    let sub = sub_normals();

    let divisors = vec![
        variety.divisor_from_polytope(Polytope::from_rows(&[[0, 0, 0], [2, 0, 0]], &sub)?)?,
        variety.divisor_from_polytope(Polytope::from_rows(
            &[[0, -1, 0], [2, -1, 0], [2, 1, 0], [0, 1, 0]],
            &sub,
        )?)?,
        variety.divisor_from_polytope(Polytope::from_rows(
            &[[0, 0, 0], [1, 0, 0], [0, 1, 0], [0, 0, 1]],
            &[NORMALS[0], NORMALS[2], NORMALS[4], NORMALS[5]],
        )?)?,
        variety.divisor_from_polytope(Polytope::from_rows(
            &[
                [0, 0, 0],
                [1, 0, 0],
                [0, 1, 0],
                [0, 0, 1],
                [1, 1, 0],
                [1, 0, 1],
                [0, 1, 1],
                [1, 1, 1],
            ],
            &sub,
        )?)?,
    ];

    let restricted_divisors = vec![
        restricted.divisor_from_polytope(Polytope::from_rows(&[[0, 0]], &SQUARE_NORMALS)?)?,
        restricted.divisor_from_polytope(Polytope::from_rows(
            &[[-1, 0], [1, 0]],
            &SQUARE_NORMALS,
        )?)?,
        restricted.divisor_from_polytope(Polytope::from_rows(
            &[[0, 0], [1, 0], [0, 1]],
            &SQUARE_NORMALS,
        )?)?,
        restricted.divisor_from_polytope(Polytope::from_rows(
            &[[0, 0], [1, 0], [0, 1], [1, 1]],
            &SQUARE_NORMALS,
        )?)?,
    ];

    Ok(LiftingExample {
        variety,
        restricted,
        divisors,
        restricted_divisors,
        partition: vec![vec![0, 1, 1], vec![0, 2, 1, 2], vec![0, 2, 1, 2]],
    })
}

impl LiftingExample {
    /// `F_0 .. F_3` with symbolic coefficients named by [`SECTION_PREFIXES`].
    pub fn generic_sections(&self) -> Result<Vec<Poly>> {
        self.divisors
            .iter()
            .zip(SECTION_PREFIXES)
            .map(|(d, prefix)| d.generic_section(prefix))
            .collect()
    }

    /// `F_0 .. F_3` with integer coefficients in `[-bound, bound]`.
    pub fn random_sections<R: Rng + ?Sized>(&self, rng: &mut R, bound: u32) -> Result<Vec<Poly>> {
        self.divisors
            .iter()
            .map(|d| d.random_section(rng, bound))
            .collect()
    }

    /// Partition matrix of `sections[1..]` over the square.
    pub fn elimination_matrix(&self, sections: &[Poly]) -> Result<PolyMatrix> {
        if sections.len() != self.divisors.len() {
            return Err(ToricError::ArityMismatch {
                expected: self.divisors.len(),
                got: sections.len(),
            });
        }
        self.restricted.partition_matrix(
            &sections[1..],
            &self.restricted_divisors[1..],
            &self.partition,
        )
    }
}
