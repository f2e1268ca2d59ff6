//! Complete toric varieties given by a defining polytope.
//!
//! Purpose
//! - A variety is fixed by the facet normals (rays) of its defining polytope.
//!   Ray `i` owns indeterminate `X_i` of the Cox ring and prime divisor `D_i`.
//! - Divisors are built from sub-polytopes (support function) or monomials;
//!   sections are graded through an optional class map.
//!
//! Conventions
//! - `class_map` is a `rank × #rays` integer matrix sending an exponent vector
//!   to its divisor class; absent unless configured.
//! - Varieties are immutable and shared by their divisors through `Arc`.

mod partition;

use std::fmt;
use std::sync::Arc;

use nalgebra::DMatrix;

use crate::algebra::{symbols, ExponentKey, Poly, Symbol};
use crate::divisor::ToricDivisor;
use crate::error::{Result, ToricError};
use crate::polytope::{checked_dot, tuple_string, IVec, Polytope};

/// Construction options for [`ToricVariety::new`].
///
/// `indeterminate_prefix` only matters when `indeterminates` is `None`; the
/// generated symbols are `prefix0, prefix1, ...` in ray order.
#[derive(Clone, Debug)]
pub struct VarietyCfg {
    pub indeterminate_prefix: String,
    pub indeterminates: Option<Vec<Symbol>>,
    pub class_map: Option<DMatrix<i64>>,
}

impl Default for VarietyCfg {
    fn default() -> Self {
        Self {
            indeterminate_prefix: "X".to_string(),
            indeterminates: None,
            class_map: None,
        }
    }
}

impl VarietyCfg {
    pub fn with_class_map(mut self, class_map: DMatrix<i64>) -> Self {
        self.class_map = Some(class_map);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.indeterminate_prefix = prefix.into();
        self
    }

    pub fn with_indeterminates(mut self, indeterminates: Vec<Symbol>) -> Self {
        self.indeterminates = Some(indeterminates);
        self
    }
}

/// Complete toric variety defined by a lattice polytope.
///
/// Invariants:
/// - `indeterminates.len() == polytope.normals().len()`;
/// - `class_map`, when present, has one column per ray.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToricVariety {
    polytope: Polytope,
    indeterminate_prefix: String,
    indeterminates: Vec<Symbol>,
    class_map: Option<DMatrix<i64>>,
}

impl ToricVariety {
    /// Resolve `cfg` against the polytope's rays.
    pub fn new(polytope: Polytope, cfg: VarietyCfg) -> Result<Arc<Self>> {
        let num_rays = polytope.normals().len();
        let indeterminates = match cfg.indeterminates {
            Some(xs) if xs.len() != num_rays => {
                return Err(ToricError::construction(format!(
                    "{} indeterminates given for {num_rays} rays",
                    xs.len()
                )))
            }
            Some(xs) => xs,
            None => symbols(&cfg.indeterminate_prefix, num_rays),
        };
        if let Some(m) = &cfg.class_map {
            if m.ncols() != num_rays {
                return Err(ToricError::construction(format!(
                    "class map has {} columns, expected one per ray ({num_rays})",
                    m.ncols()
                )));
            }
        }
        Ok(Arc::new(Self {
            polytope,
            indeterminate_prefix: cfg.indeterminate_prefix,
            indeterminates,
            class_map: cfg.class_map,
        }))
    }

    #[inline]
    pub fn polytope(&self) -> &Polytope {
        &self.polytope
    }

    /// Facet normals of the defining polytope.
    #[inline]
    pub fn rays(&self) -> &[IVec] {
        self.polytope.normals()
    }

    #[inline]
    pub fn num_rays(&self) -> usize {
        self.rays().len()
    }

    #[inline]
    pub fn indeterminates(&self) -> &[Symbol] {
        &self.indeterminates
    }

    #[inline]
    pub fn indeterminate_prefix(&self) -> &str {
        &self.indeterminate_prefix
    }

    #[inline]
    pub fn class_map(&self) -> Option<&DMatrix<i64>> {
        self.class_map.as_ref()
    }

    pub(crate) fn require_class_map(&self) -> Result<&DMatrix<i64>> {
        self.class_map.as_ref().ok_or(ToricError::MissingClassMap)
    }

    /// Image of a ray-exponent vector under the class map.
    pub fn class_of(&self, exponents: &IVec) -> Result<IVec> {
        let class_map = self.require_class_map()?;
        if exponents.len() != self.num_rays() {
            return Err(ToricError::construction(format!(
                "exponent vector of length {} for {} rays",
                exponents.len(),
                self.num_rays()
            )));
        }
        apply_class_map(class_map, exponents)
    }

    /// Divisor whose polytope is `subpolytope`: `a_i = -min_m r_i · m` over its
    /// lattice points. The divisor remembers `subpolytope`.
    pub fn divisor_from_polytope(
        self: &Arc<Self>,
        subpolytope: Polytope,
    ) -> Result<ToricDivisor> {
        if subpolytope.ambient_dim() != self.polytope.ambient_dim() {
            return Err(ToricError::construction(format!(
                "sub-polytope lives in dimension {}, variety in {}",
                subpolytope.ambient_dim(),
                self.polytope.ambient_dim()
            )));
        }
        let rays = self.rays();
        let mut mins: Option<IVec> = None;
        for m in subpolytope.lattice_points() {
            let vals = rays
                .iter()
                .map(|r| {
                    checked_dot(r, &m).ok_or_else(|| {
                        ToricError::overflow(format!("{} · {}", tuple_string(r), tuple_string(&m)))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let vals = IVec::from_vec(vals);
            mins = Some(match mins {
                None => vals,
                Some(cur) => cur.zip_map(&vals, i64::min),
            });
        }
        let mins = mins.ok_or_else(|| ToricError::NoLatticePoints {
            polytope: subpolytope.to_string(),
        })?;
        let coeffs = mins
            .iter()
            .map(|&x| x.checked_neg())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ToricError::overflow("divisor coefficient"))?;
        let coeffs = IVec::from_vec(coeffs);
        tracing::debug!(
            polytope = %subpolytope,
            coeffs = ?coeffs.as_slice(),
            "divisor_from_polytope"
        );
        ToricDivisor::new(Arc::clone(self), coeffs, Some(subpolytope))
    }

    /// Divisor read off the exponent vector of a single-term polynomial.
    ///
    /// Symbols outside the indeterminates (and the numeric coefficient) are
    /// ignored; the expression must still have exactly one exponent vector.
    pub fn divisor_from_monomial(self: &Arc<Self>, monomial: &Poly) -> Result<ToricDivisor> {
        let mut keys = monomial.coefficients_in(&self.indeterminates).into_keys();
        match (keys.next(), keys.next()) {
            (Some(key), None) => ToricDivisor::new(Arc::clone(self), key_vector(&key), None),
            _ => Err(ToricError::NotAMonomial {
                expr: monomial.to_string(),
            }),
        }
    }

    /// Common class of all monomials of `section`.
    pub fn degree_of(&self, section: &Poly) -> Result<IVec> {
        let class_map = self.require_class_map()?;
        let coeffs = section.coefficients_in(&self.indeterminates);
        let mut keys = coeffs.keys();
        let first = keys.next().ok_or(ToricError::ZeroSection)?;
        let first = apply_class_map(class_map, &key_vector(first))?;
        for k in keys {
            if apply_class_map(class_map, &key_vector(k))? != first {
                return Err(ToricError::NotHomogeneous {
                    section: section.to_string(),
                });
            }
        }
        Ok(first)
    }
}

impl fmt::Display for ToricVariety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompleteToricVariety({})", self.polytope)
    }
}

/// `class_map · v`; `Overflow` instead of wrapping.
fn apply_class_map(class_map: &DMatrix<i64>, v: &IVec) -> Result<IVec> {
    let rows = class_map
        .row_iter()
        .map(|row| {
            row.iter()
                .zip(v.iter())
                .try_fold(0i64, |acc, (&a, &x)| acc.checked_add(a.checked_mul(x)?))
                .ok_or_else(|| ToricError::overflow("class map product"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(IVec::from_vec(rows))
}

/// Exponent key as an integer vector.
pub(crate) fn key_vector(key: &[u32]) -> IVec {
    IVec::from_iterator(key.len(), key.iter().map(|&e| i64::from(e)))
}

/// Integer vector as an exponent key; `None` if some entry is negative or
/// beyond `u32`.
pub(crate) fn exponent_key(v: &IVec) -> Option<ExponentKey> {
    v.iter().map(|&e| u32::try_from(e).ok()).collect()
}
