//! Partition matrices for resultant-style elimination.

use super::{exponent_key, ToricVariety};
use crate::algebra::{self, Poly, PolyMatrix};
use crate::divisor::ToricDivisor;
use crate::error::{Result, ToricError};
use crate::polytope::IVec;

impl ToricVariety {
    /// Square matrix whose determinant is the elimination candidate.
    ///
    /// Row `i` belongs to `sections[i]` and `divisors[i]`. The lattice points of
    /// `divisors[i]`'s polytope, in enumeration order, are labelled by
    /// `lattice_point_partitions[i]`; entry `(i, j)` collects, over the points
    /// labelled `j`, `coeff(t) · X^t` where `t` is the point's facet-distance
    /// vector and `coeff(t)` the coefficient of `X^t` in `sections[i]` over this
    /// variety's indeterminates.
    ///
    /// A point whose `t` is not an exponent of `sections[i]` contributes
    /// nothing. Such drops are counted and logged at debug level since they
    /// usually mean the labelling and the sections disagree.
    ///
    /// The determinant itself is left to [`algebra::determinant`].
    pub fn partition_matrix(
        &self,
        sections: &[Poly],
        divisors: &[ToricDivisor],
        lattice_point_partitions: &[Vec<usize>],
    ) -> Result<PolyMatrix> {
        let dim = sections.len();
        if divisors.len() != dim || lattice_point_partitions.len() != dim {
            return Err(ToricError::partition(format!(
                "{dim} sections, {} divisors and {} label lists",
                divisors.len(),
                lattice_point_partitions.len()
            )));
        }

        let mut matrix = algebra::zeros(dim, dim);
        let rows = sections.iter().zip(divisors).zip(lattice_point_partitions);
        for (i, ((section, divisor), labels)) in rows.enumerate() {
            let polytope = divisor.polytope().ok_or(ToricError::MissingPolytope)?;
            let points: Vec<IVec> = polytope.lattice_points().collect();
            if labels.len() != points.len() {
                return Err(ToricError::partition(format!(
                    "row {i}: {} labels for {} lattice points",
                    labels.len(),
                    points.len()
                )));
            }
            if let Some(&bad) = labels.iter().find(|&&j| j >= dim) {
                return Err(ToricError::partition(format!(
                    "row {i}: label {bad} out of range for dimension {dim}"
                )));
            }

            let coeffs = section.coefficients_in(self.indeterminates());
            let mut dropped = 0usize;
            for (p, &j) in points.iter().zip(labels) {
                let t = polytope.facet_distances_from_point(p)?;
                let Some(coeff) = exponent_key(&t).and_then(|key| coeffs.get(&key)) else {
                    dropped += 1;
                    continue;
                };
                let monomial = divisor.monomial_from_exponent_vector(&t)?;
                matrix[(i, j)] += coeff.try_mul(&monomial)?;
            }
            if dropped > 0 {
                tracing::debug!(
                    row = i,
                    dropped,
                    "lattice points with no matching section term"
                );
            }
        }
        Ok(matrix)
    }
}
