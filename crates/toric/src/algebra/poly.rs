//! Sparse polynomials with integer coefficients over named symbols.
//!
//! Representation
//! - `Monomial`: symbol → positive exponent (zero exponents are never stored).
//! - `Poly`: monomial → non-zero `IBig` coefficient, kept in a `BTreeMap` so
//!   iteration and printing are deterministic.
//!
//! Coefficients never overflow. Exponents are `u32`; products that would push
//! one past `u32::MAX` fail with `ToricError::Overflow`, which is why
//! multiplication is `try_mul` rather than an operator.
//!
//! There is no global variable list. A polynomial is only split into
//! "indeterminates" and "coefficients" on request (`coefficients_in`), which is
//! how the same expression can be read against two different varieties.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

use dashu::base::Signed;
use dashu::integer::IBig;

use super::symbol::Symbol;
use crate::error::{Result, ToricError};

/// Exponent vector over an ordered list of indeterminates.
pub type ExponentKey = Vec<u32>;

/// Power product of symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<Symbol, u32>);

impl Monomial {
    #[inline]
    pub fn one() -> Self {
        Self(BTreeMap::new())
    }

    pub fn var(symbol: Symbol) -> Self {
        let mut m = BTreeMap::new();
        m.insert(symbol, 1);
        Self(m)
    }

    /// `∏ gens[i]^exps[i]`; pairs beyond the shorter slice are ignored.
    /// A symbol listed twice keeps its last exponent.
    pub fn from_exponents(gens: &[Symbol], exps: &[u32]) -> Self {
        Self(
            gens.iter()
                .zip(exps)
                .filter(|(_, &e)| e > 0)
                .map(|(g, &e)| (g.clone(), e))
                .collect(),
        )
    }

    #[inline]
    pub fn exponent(&self, symbol: &Symbol) -> u32 {
        self.0.get(symbol).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    /// Total degree.
    pub fn degree(&self) -> u64 {
        self.0.values().map(|&e| u64::from(e)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, u32)> {
        self.0.iter().map(|(s, &e)| (s, e))
    }

    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        let mut out = self.clone();
        for (s, &e) in &other.0 {
            let slot = out.0.entry(s.clone()).or_insert(0);
            *slot = slot
                .checked_add(e)
                .ok_or_else(|| ToricError::overflow(format!("exponent of {s}")))?;
        }
        Ok(out)
    }

    /// Split into the exponents of `gens` and the cofactor in all other symbols.
    pub fn split(&self, gens: &[Symbol]) -> (ExponentKey, Monomial) {
        let key = gens.iter().map(|g| self.exponent(g)).collect();
        let rest = self
            .0
            .iter()
            .filter(|(s, _)| !gens.contains(s))
            .map(|(s, &e)| (s.clone(), e))
            .collect();
        (key, Self(rest))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return f.write_str("1");
        }
        let mut first = true;
        for (s, e) in self.iter() {
            if !first {
                f.write_str("*")?;
            }
            first = false;
            if e == 1 {
                write!(f, "{s}")?;
            } else {
                write!(f, "{s}^{e}")?;
            }
        }
        Ok(())
    }
}

/// Sparse polynomial with arbitrary-precision integer coefficients.
///
/// Invariant: no stored coefficient is zero, so `Poly::zero()` has no terms
/// and structural equality is polynomial equality.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Poly {
    terms: BTreeMap<Monomial, IBig>,
}

impl Poly {
    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn one() -> Self {
        Self::constant(1)
    }

    pub fn constant(c: impl Into<IBig>) -> Self {
        Self::from_term(Monomial::one(), c.into())
    }

    pub fn symbol(symbol: Symbol) -> Self {
        Self::from_term(Monomial::var(symbol), IBig::ONE)
    }

    /// Shorthand for `Poly::symbol(Symbol::new(name))`.
    pub fn var(name: &str) -> Self {
        Self::symbol(Symbol::new(name))
    }

    pub fn from_term(monomial: Monomial, coeff: IBig) -> Self {
        let mut p = Self::zero();
        p.add_term(monomial, coeff);
        p
    }

    /// `∏ gens[i]^exps[i]` with coefficient one.
    pub fn monomial(gens: &[Symbol], exps: &[u32]) -> Self {
        Self::from_term(Monomial::from_exponents(gens, exps), IBig::ONE)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Constant polynomial (zero included).
    pub fn as_constant(&self) -> Option<IBig> {
        match self.terms.len() {
            0 => Some(IBig::ZERO),
            1 => self.terms.get(&Monomial::one()).cloned(),
            _ => None,
        }
    }

    /// Number of non-zero terms.
    #[inline]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &IBig)> {
        self.terms.iter()
    }

    pub fn add_term(&mut self, monomial: Monomial, coeff: IBig) {
        if coeff.is_zero() {
            return;
        }
        match self.terms.entry(monomial) {
            Entry::Vacant(slot) => {
                slot.insert(coeff);
            }
            Entry::Occupied(mut slot) => {
                *slot.get_mut() += coeff;
                if slot.get().is_zero() {
                    slot.remove();
                }
            }
        }
    }

    pub fn scale(&self, c: impl Into<IBig>) -> Self {
        let c = c.into();
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self.terms.iter().map(|(m, k)| (m.clone(), k * &c)).collect(),
        }
    }

    /// Schoolbook product; fails only when an exponent leaves `u32`.
    pub fn try_mul(&self, rhs: &Poly) -> Result<Poly> {
        let mut out = Poly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                out.add_term(ma.try_mul(mb)?, ca * cb);
            }
        }
        Ok(out)
    }

    /// Repeated squaring.
    pub fn try_pow(&self, mut e: u32) -> Result<Self> {
        let mut base = self.clone();
        let mut acc = Self::one();
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.try_mul(&base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.try_mul(&base)?;
            }
        }
        Ok(acc)
    }

    /// Decompose over an ordered list of indeterminates.
    ///
    /// Each term `c · ∏ gens^k · rest` is filed under key `k` with coefficient
    /// `c · rest`. Keys with a zero coefficient are absent, so a lookup miss
    /// means "coefficient zero".
    pub fn coefficients_in(&self, gens: &[Symbol]) -> BTreeMap<ExponentKey, Poly> {
        let mut out: BTreeMap<ExponentKey, Poly> = BTreeMap::new();
        for (m, c) in &self.terms {
            let (key, rest) = m.split(gens);
            out.entry(key).or_default().add_term(rest, c.clone());
        }
        out.retain(|_, p| !p.is_zero());
        out
    }

    /// Inverse of [`Poly::coefficients_in`].
    pub fn from_coefficients(
        gens: &[Symbol],
        coeffs: &BTreeMap<ExponentKey, Poly>,
    ) -> Result<Self> {
        let mut out = Self::zero();
        for (key, c) in coeffs {
            let m = Monomial::from_exponents(gens, key);
            for (rest, k) in c.terms() {
                out.add_term(rest.try_mul(&m)?, k.clone());
            }
        }
        Ok(out)
    }
}

impl From<i64> for Poly {
    fn from(c: i64) -> Self {
        Self::constant(c)
    }
}

impl From<IBig> for Poly {
    fn from(c: IBig) -> Self {
        Self::constant(c)
    }
}

impl From<Symbol> for Poly {
    fn from(s: Symbol) -> Self {
        Self::symbol(s)
    }
}

impl From<Monomial> for Poly {
    fn from(m: Monomial) -> Self {
        Self::from_term(m, IBig::ONE)
    }
}

impl AddAssign<&Poly> for Poly {
    fn add_assign(&mut self, rhs: &Poly) {
        for (m, c) in &rhs.terms {
            self.add_term(m.clone(), c.clone());
        }
    }
}

impl AddAssign for Poly {
    fn add_assign(&mut self, rhs: Poly) {
        for (m, c) in rhs.terms {
            self.add_term(m, c);
        }
    }
}

impl Add<&Poly> for &Poly {
    type Output = Poly;
    fn add(self, rhs: &Poly) -> Poly {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Add for Poly {
    type Output = Poly;
    fn add(mut self, rhs: Poly) -> Poly {
        self += rhs;
        self
    }
}

impl Neg for &Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        Poly {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }
}

impl Neg for Poly {
    type Output = Poly;
    fn neg(mut self) -> Poly {
        for c in self.terms.values_mut() {
            *c = -std::mem::take(c);
        }
        self
    }
}

impl Sub<&Poly> for &Poly {
    type Output = Poly;
    fn sub(self, rhs: &Poly) -> Poly {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), -c);
        }
        out
    }
}

impl Sub for Poly {
    type Output = Poly;
    fn sub(self, rhs: Poly) -> Poly {
        &self - &rhs
    }
}

impl Sum for Poly {
    fn sum<I: Iterator<Item = Poly>>(iter: I) -> Self {
        iter.fold(Poly::zero(), |acc, p| acc + p)
    }
}

impl<'a> Sum<&'a Poly> for Poly {
    fn sum<I: Iterator<Item = &'a Poly>>(iter: I) -> Self {
        iter.fold(Poly::zero(), |mut acc, p| {
            acc += p;
            acc
        })
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        for (i, (m, c)) in self.terms.iter().enumerate() {
            let negative = c.is_negative();
            let magnitude = if negative { -c } else { c.clone() };
            match (i, negative) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            if m.is_one() {
                write!(f, "{magnitude}")?;
            } else if magnitude == IBig::ONE {
                write!(f, "{m}")?;
            } else {
                write!(f, "{magnitude}*{m}")?;
            }
        }
        Ok(())
    }
}
