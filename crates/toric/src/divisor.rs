//! Torus-invariant divisors and their sections.
//!
//! A divisor `D = Σ a_i D_i` is stored as its coefficient vector over the rays
//! of its variety. When it came from a polytope `P`, the lattice points `m` of
//! `P` give the monomial basis `∏ X_i^{<n_i, m> + a_i}` of its global sections.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::algebra::{symbols, Poly};
use crate::error::{Result, ToricError};
use crate::polytope::{checked_dot, tuple_string, IVec, Polytope};
use crate::variety::ToricVariety;

#[derive(Clone, Debug)]
pub struct ToricDivisor {
    variety: Arc<ToricVariety>,
    coeffs: IVec,
    polytope: Option<Polytope>,
}

impl ToricDivisor {
    /// Needs one coefficient per ray; a polytope must share the variety's
    /// ambient dimension.
    pub fn new(
        variety: Arc<ToricVariety>,
        coeffs: IVec,
        polytope: Option<Polytope>,
    ) -> Result<Self> {
        if coeffs.len() != variety.num_rays() {
            return Err(ToricError::construction(format!(
                "{} divisor coefficients for {} rays",
                coeffs.len(),
                variety.num_rays()
            )));
        }
        if let Some(p) = &polytope {
            if p.ambient_dim() != variety.polytope().ambient_dim() {
                return Err(ToricError::construction(format!(
                    "divisor polytope lives in dimension {}, variety in {}",
                    p.ambient_dim(),
                    variety.polytope().ambient_dim()
                )));
            }
        }
        Ok(Self {
            variety,
            coeffs,
            polytope,
        })
    }

    #[inline]
    pub fn variety(&self) -> &Arc<ToricVariety> {
        &self.variety
    }

    #[inline]
    pub fn prime_divisor_coeffs(&self) -> &IVec {
        &self.coeffs
    }

    #[inline]
    pub fn polytope(&self) -> Option<&Polytope> {
        self.polytope.as_ref()
    }

    fn check_same_variety(&self, other: &Self) -> Result<()> {
        if Arc::ptr_eq(&self.variety, &other.variety) || *self.variety == *other.variety {
            Ok(())
        } else {
            Err(ToricError::VarietyMismatch)
        }
    }

    /// Coefficientwise sum. The result has no polytope: addition happens in
    /// the divisor group only.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_variety(other)?;
        let coeffs = self
            .coeffs
            .iter()
            .zip(other.coeffs.iter())
            .map(|(&a, &b)| a.checked_add(b))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ToricError::overflow("divisor sum"))?;
        Ok(Self {
            variety: Arc::clone(&self.variety),
            coeffs: IVec::from_vec(coeffs),
            polytope: None,
        })
    }

    /// Linear equivalence: equal classes under the variety's class map.
    pub fn is_equivalent(&self, other: &Self) -> Result<bool> {
        self.check_same_variety(other)?;
        Ok(self.equiv_class()? == other.equiv_class()?)
    }

    /// `class_map · coeffs`.
    pub fn equiv_class(&self) -> Result<IVec> {
        self.variety.class_of(&self.coeffs)
    }

    /// `∏ X_i^{<n_i, point> + a_i}`.
    pub fn monomial_from_lattice_point(&self, point: &IVec) -> Result<Poly> {
        let dim = self.variety.polytope().ambient_dim();
        if point.len() != dim {
            return Err(ToricError::construction(format!(
                "lattice point {} is not in dimension {dim}",
                tuple_string(point)
            )));
        }
        let exps = self
            .variety
            .rays()
            .iter()
            .zip(self.coeffs.iter())
            .map(|(n, &a)| checked_dot(n, point).and_then(|d| d.checked_add(a)))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                ToricError::overflow(format!("exponents at {}", tuple_string(point)))
            })?;
        self.monomial_from_exponent_vector(&IVec::from_vec(exps))
    }

    /// `∏ X_i^{v_i}`; every entry must be non-negative and fit in `u32`.
    pub fn monomial_from_exponent_vector(&self, vector: &IVec) -> Result<Poly> {
        let gens = self.variety.indeterminates();
        if vector.len() != gens.len() {
            return Err(ToricError::construction(format!(
                "exponent vector of length {} for {} indeterminates",
                vector.len(),
                gens.len()
            )));
        }
        let mut exps = Vec::with_capacity(gens.len());
        for (x, &e) in gens.iter().zip(vector.iter()) {
            if e < 0 {
                return Err(ToricError::NegativeExponent {
                    indeterminate: x.to_string(),
                    exponent: e,
                });
            }
            let e = u32::try_from(e)
                .map_err(|_| ToricError::overflow(format!("exponent {e} of {x}")))?;
            exps.push(e);
        }
        Ok(Poly::monomial(gens, &exps))
    }

    /// Monomials of the lattice points of the divisor's polytope, in
    /// enumeration order.
    pub fn section_basis(&self) -> Result<Vec<Poly>> {
        let polytope = self.polytope.as_ref().ok_or(ToricError::MissingPolytope)?;
        polytope
            .lattice_points()
            .map(|m| self.monomial_from_lattice_point(&m))
            .collect()
    }

    /// `Σ coeffs[i] · basis[i]`; exactly one coefficient per basis monomial.
    pub fn section(&self, coeffs: &[Poly]) -> Result<Poly> {
        let basis = self.section_basis()?;
        if coeffs.len() != basis.len() {
            return Err(ToricError::ArityMismatch {
                expected: basis.len(),
                got: coeffs.len(),
            });
        }
        let mut out = Poly::zero();
        for (c, b) in coeffs.iter().zip(&basis) {
            out += c.try_mul(b)?;
        }
        Ok(out)
    }

    /// Section with symbolic coefficients `prefix0, prefix1, ...`.
    pub fn generic_section(&self, prefix: &str) -> Result<Poly> {
        let n = self.section_basis()?.len();
        let coeffs: Vec<Poly> = symbols(prefix, n).into_iter().map(Poly::symbol).collect();
        self.section(&coeffs)
    }

    /// Section with integer coefficients drawn uniformly from `[-bound, bound]`.
    pub fn random_section<R: Rng + ?Sized>(&self, rng: &mut R, bound: u32) -> Result<Poly> {
        let n = self.section_basis()?.len();
        let bound = i64::from(bound);
        let coeffs: Vec<Poly> = (0..n)
            .map(|_| Poly::constant(rng.gen_range(-bound..=bound)))
            .collect();
        self.section(&coeffs)
    }
}

impl fmt::Display for ToricDivisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&tuple_string(&self.coeffs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::IBig;
    use crate::polytope::ivec;
    use crate::variety::VarietyCfg;
    use nalgebra::dmatrix;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// P^2 with rays e1, e2, -e1-e2 and class map (1, 1, 1).
    fn projective_plane() -> Arc<ToricVariety> {
        let poly = Polytope::from_rows(&[[0, 0], [1, 0], [0, 1]], &[[1, 0], [0, 1], [-1, -1]])
            .unwrap();
        ToricVariety::new(poly, VarietyCfg::default().with_class_map(dmatrix![1, 1, 1]))
            .unwrap()
    }

    fn conic_triangle() -> Polytope {
        Polytope::from_rows(&[[0, 0], [2, 0], [0, 2]], &[[1, 0], [0, 1], [-1, -1]]).unwrap()
    }

    #[test]
    fn printing() {
        let var = projective_plane();
        let div = ToricDivisor::new(var, ivec(&[1, 1, 1]), None).unwrap();
        assert_eq!(div.to_string(), "(1, 1, 1)");
    }

    #[test]
    fn coefficient_count_must_match_rays() {
        let var = projective_plane();
        let err = ToricDivisor::new(var, ivec(&[1, 1]), None).unwrap_err();
        assert!(matches!(err, ToricError::Construction { .. }));
    }

    #[test]
    fn conic_basis_is_all_degree_two_monomials() {
        let var = projective_plane();
        let d = var.divisor_from_polytope(conic_triangle()).unwrap();
        assert_eq!(d.prime_divisor_coeffs(), &ivec(&[0, 0, 2]));
        let basis: Vec<String> =
            d.section_basis().unwrap().iter().map(|m| m.to_string()).collect();
        // points (0,0),(0,1),(0,2),(1,0),(1,1),(2,0)
        assert_eq!(basis, vec!["X2^2", "X1*X2", "X1^2", "X0*X2", "X0*X1", "X0^2"]);
        for m in d.section_basis().unwrap() {
            assert_eq!(var.degree_of(&m).unwrap(), ivec(&[2]));
        }
    }

    #[test]
    fn section_needs_polytope_and_matching_arity() {
        let var = projective_plane();
        let bare = ToricDivisor::new(var.clone(), ivec(&[0, 0, 1]), None).unwrap();
        assert_eq!(bare.section_basis().unwrap_err(), ToricError::MissingPolytope);
        assert_eq!(bare.section(&[]).unwrap_err(), ToricError::MissingPolytope);

        let d = var.divisor_from_polytope(conic_triangle()).unwrap();
        let err = d.section(&[Poly::one(), Poly::one()]).unwrap_err();
        assert_eq!(err, ToricError::ArityMismatch { expected: 6, got: 2 });
    }

    #[test]
    fn generic_section_is_homogeneous() {
        let var = projective_plane();
        let d = var.divisor_from_polytope(conic_triangle()).unwrap();
        let f = d.generic_section("a").unwrap();
        assert_eq!(f.num_terms(), 6);
        assert_eq!(var.degree_of(&f).unwrap(), ivec(&[2]));
        let expected: Poly = "a0*X2^2 + a1*X1*X2 + a2*X1^2 + a3*X0*X2 + a4*X0*X1 + a5*X0^2"
            .parse()
            .unwrap();
        assert_eq!(f, expected);
    }

    #[test]
    fn random_section_is_replayable() {
        let var = projective_plane();
        let d = var.divisor_from_polytope(conic_triangle()).unwrap();
        let f = d.random_section(&mut StdRng::seed_from_u64(7), 5).unwrap();
        let g = d.random_section(&mut StdRng::seed_from_u64(7), 5).unwrap();
        assert_eq!(f, g);
        let (lo, hi) = (IBig::from(-5), IBig::from(5));
        assert!(f.terms().all(|(_, c)| &lo <= c && c <= &hi));
        if !f.is_zero() {
            assert_eq!(var.degree_of(&f).unwrap(), ivec(&[2]));
        }
    }

    #[test]
    fn lattice_point_outside_gives_negative_exponent() {
        let var = projective_plane();
        let d = var.divisor_from_polytope(conic_triangle()).unwrap();
        let err = d.monomial_from_lattice_point(&ivec(&[3, 0])).unwrap_err();
        assert_eq!(
            err,
            ToricError::NegativeExponent {
                indeterminate: "X2".into(),
                exponent: -1
            }
        );
    }

    #[test]
    fn huge_exponents_are_overflow_errors() {
        let var = projective_plane();
        let d = var.divisor_from_polytope(conic_triangle()).unwrap();
        let err = d.monomial_from_lattice_point(&ivec(&[i64::MAX, 0])).unwrap_err();
        assert!(matches!(err, ToricError::Overflow { .. }));
        let err = d.monomial_from_exponent_vector(&ivec(&[1 << 40, 0, 0])).unwrap_err();
        assert!(matches!(err, ToricError::Overflow { .. }));

        let big = ToricDivisor::new(var.clone(), ivec(&[i64::MAX, 0, 0]), None).unwrap();
        let one = ToricDivisor::new(var.clone(), ivec(&[1, 0, 0]), None).unwrap();
        assert!(matches!(big.add(&one).unwrap_err(), ToricError::Overflow { .. }));
    }

    #[test]
    fn wide_random_coefficients_stay_exact() {
        let var = projective_plane();
        let d = var.divisor_from_polytope(conic_triangle()).unwrap();
        let f = d.random_section(&mut StdRng::seed_from_u64(11), u32::MAX).unwrap();
        let squared = f.try_mul(&f).unwrap();
        if !f.is_zero() {
            assert_eq!(var.degree_of(&squared).unwrap(), ivec(&[4]));
        }
        assert_eq!(squared.to_string().parse::<Poly>().unwrap(), squared);
    }

    #[test]
    fn addition_drops_polytope_and_adds_classes() {
        let var = projective_plane();
        let d = var.divisor_from_polytope(conic_triangle()).unwrap();
        let line = ToricDivisor::new(var.clone(), ivec(&[1, 0, 0]), None).unwrap();
        let sum = d.add(&line).unwrap();
        assert!(sum.polytope().is_none());
        assert_eq!(sum.prime_divisor_coeffs(), &ivec(&[1, 0, 2]));
        assert_eq!(sum.equiv_class().unwrap(), ivec(&[3]));
    }

    #[test]
    fn equivalence_uses_classes() {
        let var = projective_plane();
        let h0 = ToricDivisor::new(var.clone(), ivec(&[1, 0, 0]), None).unwrap();
        let h2 = ToricDivisor::new(var.clone(), ivec(&[0, 0, 1]), None).unwrap();
        let two = ToricDivisor::new(var.clone(), ivec(&[2, 0, 0]), None).unwrap();
        assert!(h0.is_equivalent(&h2).unwrap());
        assert!(!h0.is_equivalent(&two).unwrap());
    }

    #[test]
    fn class_map_required_for_classes() {
        let poly = Polytope::from_rows(&[[0, 0], [1, 0], [0, 1]], &[[1, 0], [0, 1], [-1, -1]])
            .unwrap();
        let var = ToricVariety::new(poly, VarietyCfg::default()).unwrap();
        let d = ToricDivisor::new(var.clone(), ivec(&[1, 0, 0]), None).unwrap();
        assert_eq!(d.equiv_class().unwrap_err(), ToricError::MissingClassMap);
        assert_eq!(d.is_equivalent(&d).unwrap_err(), ToricError::MissingClassMap);
    }

    #[test]
    fn divisors_of_different_varieties_do_not_mix() {
        let a = projective_plane();
        let b = ToricVariety::new(
            Polytope::from_rows(&[[0, 0], [1, 1]], &[[1, 0], [0, 1], [-1, 0], [0, -1]]).unwrap(),
            VarietyCfg::default(),
        )
        .unwrap();
        let da = ToricDivisor::new(a, ivec(&[1, 0, 0]), None).unwrap();
        let db = ToricDivisor::new(b, ivec(&[1, 0, 0, 0]), None).unwrap();
        assert_eq!(da.add(&db).unwrap_err(), ToricError::VarietyMismatch);
    }

    fn small_coeffs(n: usize) -> impl Strategy<Value = Vec<i64>> {
        proptest::collection::vec(-4i64..=4, n)
    }

    proptest! {
        #[test]
        fn section_is_linear(a in small_coeffs(6), b in small_coeffs(6)) {
            let var = projective_plane();
            let d = var.divisor_from_polytope(conic_triangle()).unwrap();
            let pa: Vec<Poly> = a.iter().map(|&c| Poly::constant(c)).collect();
            let pb: Vec<Poly> = b.iter().map(|&c| Poly::constant(c)).collect();
            let psum: Vec<Poly> = a.iter().zip(&b).map(|(&x, &y)| Poly::constant(x + y)).collect();
            let lhs = &d.section(&pa).unwrap() + &d.section(&pb).unwrap();
            prop_assert_eq!(lhs, d.section(&psum).unwrap());
        }

        #[test]
        fn equiv_class_is_additive(a in small_coeffs(3), b in small_coeffs(3)) {
            let var = projective_plane();
            let da = ToricDivisor::new(var.clone(), IVec::from_vec(a), None).unwrap();
            let db = ToricDivisor::new(var.clone(), IVec::from_vec(b), None).unwrap();
            let sum = da.add(&db).unwrap();
            prop_assert_eq!(
                sum.equiv_class().unwrap(),
                da.equiv_class().unwrap() + db.equiv_class().unwrap()
            );
        }
    }
}
