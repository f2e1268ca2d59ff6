//! Integer vectors, halfspaces and the vertex/normal polytope.

use std::fmt;

use nalgebra::DVector;

use super::lattice::LatticePoints;
use crate::error::{Result, ToricError};

/// Integer vector used for vertices, normals, lattice points and exponents.
pub type IVec = DVector<i64>;

/// Build an [`IVec`] from a slice.
#[inline]
pub fn ivec(xs: &[i64]) -> IVec {
    DVector::from_vec(xs.to_vec())
}

/// `a · b` accumulated in `i128`; `None` only if even that overflows.
fn wide_dot(a: &IVec, b: &IVec) -> Option<i128> {
    a.iter()
        .zip(b.iter())
        .try_fold(0i128, |acc, (&x, &y)| acc.checked_add(i128::from(x) * i128::from(y)))
}

/// `a · b` when it fits in `i64`.
pub(crate) fn checked_dot(a: &IVec, b: &IVec) -> Option<i64> {
    wide_dot(a, b).and_then(|d| i64::try_from(d).ok())
}

/// Closed halfspace `normal · x >= min`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Halfspace {
    pub normal: IVec,
    pub min: i64,
}

impl Halfspace {
    #[inline]
    pub fn new(normal: IVec, min: i64) -> Self {
        Self { normal, min }
    }

    /// Caller guarantees `p` has the normal's dimension.
    #[inline]
    pub fn satisfies(&self, p: &IVec) -> bool {
        wide_dot(&self.normal, p).is_some_and(|d| d >= i128::from(self.min))
    }

    /// Lattice distance `normal · p - min`; zero on the bounding hyperplane.
    /// `None` when the distance does not fit in `i64`.
    #[inline]
    pub fn slack(&self, p: &IVec) -> Option<i64> {
        let d = wide_dot(&self.normal, p)?.checked_sub(i128::from(self.min))?;
        i64::try_from(d).ok()
    }
}

/// Convex hull of integer vertices, described together with its facet normals.
///
/// Invariants:
/// - at least one vertex and one normal, all of dimension `ambient_dim() >= 1`;
/// - `halfspaces[i]` belongs to `normals[i]` and every vertex satisfies it.
///
/// Normals are trusted: they are not checked to actually be facet normals of
/// the hull, only their offsets are derived from the vertices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polytope {
    vertices: Vec<IVec>,
    normals: Vec<IVec>,
    halfspaces: Vec<Halfspace>,
}

impl Polytope {
    /// Derive one halfspace per normal: `min = min_v normal · v`.
    ///
    /// Errors: `Construction` for empty or mismatched inputs, `Overflow` when
    /// some `normal · vertex` leaves `i64`.
    ///
    /// Complexity: O(|normals| · |vertices|).
    pub fn new(vertices: Vec<IVec>, normals: Vec<IVec>) -> Result<Self> {
        let dim = match vertices.first() {
            Some(v) => v.len(),
            None => return Err(ToricError::construction("polytope needs at least one vertex")),
        };
        if dim == 0 {
            return Err(ToricError::construction("ambient dimension must be positive"));
        }
        if normals.is_empty() {
            return Err(ToricError::construction("polytope needs at least one normal"));
        }
        if let Some(v) = vertices.iter().find(|v| v.len() != dim) {
            return Err(ToricError::construction(format!(
                "vertex {} has dimension {}, expected {dim}",
                tuple_string(v),
                v.len()
            )));
        }
        if let Some(n) = normals.iter().find(|n| n.len() != dim) {
            return Err(ToricError::construction(format!(
                "normal {} has dimension {}, expected {dim}",
                tuple_string(n),
                n.len()
            )));
        }

        let halfspaces = normals
            .iter()
            .map(|n| {
                let mut min = i64::MAX;
                for v in &vertices {
                    let d = checked_dot(n, v).ok_or_else(|| {
                        ToricError::overflow(format!("{} · {}", tuple_string(n), tuple_string(v)))
                    })?;
                    min = min.min(d);
                }
                Ok(Halfspace::new(n.clone(), min))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vertices,
            normals,
            halfspaces,
        })
    }

    /// Convenience constructor from fixed-size rows.
    pub fn from_rows<const K: usize>(vertices: &[[i64; K]], normals: &[[i64; K]]) -> Result<Self> {
        Self::new(
            vertices.iter().map(|v| ivec(v)).collect(),
            normals.iter().map(|n| ivec(n)).collect(),
        )
    }

    #[inline]
    pub fn vertices(&self) -> &[IVec] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[IVec] {
        &self.normals
    }

    #[inline]
    pub fn halfspaces(&self) -> &[Halfspace] {
        &self.halfspaces
    }

    /// Dimension of the ambient lattice (length of the first vertex).
    #[inline]
    pub fn ambient_dim(&self) -> usize {
        self.vertices[0].len()
    }

    /// `true` iff every halfspace holds at `point`. Points of another
    /// dimension are never contained.
    pub fn contains(&self, point: &IVec) -> bool {
        point.len() == self.ambient_dim() && self.halfspaces.iter().all(|h| h.satisfies(point))
    }

    /// Per-axis minimum and maximum over the vertices.
    pub fn bounding_box(&self) -> (IVec, IVec) {
        let dim = self.ambient_dim();
        let lo = IVec::from_fn(dim, |i, _| {
            self.vertices.iter().map(|v| v[i]).min().unwrap_or_default()
        });
        let hi = IVec::from_fn(dim, |i, _| {
            self.vertices.iter().map(|v| v[i]).max().unwrap_or_default()
        });
        (lo, hi)
    }

    /// Lattice points of the polytope in lexicographic bounding-box order.
    ///
    /// Every call returns a fresh iterator. The search filters the whole box,
    /// so the cost is the box volume times the number of normals; fine for
    /// the small dimensions and extents this crate deals with.
    pub fn lattice_points(&self) -> LatticePoints<'_> {
        LatticePoints::new(self)
    }

    /// `normal_i · point - min_i` for every halfspace, in `normals` order.
    ///
    /// Entries are non-negative inside the polytope and zero exactly on the
    /// corresponding facet hyperplane. `Overflow` if one leaves `i64`.
    pub fn facet_distances_from_point(&self, point: &IVec) -> Result<IVec> {
        let slacks = self
            .halfspaces
            .iter()
            .map(|h| {
                h.slack(point).ok_or_else(|| {
                    ToricError::overflow(format!("facet distance of {}", tuple_string(point)))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(IVec::from_vec(slacks))
    }
}

impl fmt::Display for Polytope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verts: Vec<String> = self.vertices.iter().map(tuple_string).collect();
        write!(f, "conv{{{}}}", verts.join(", "))
    }
}

/// Render a vector as a tuple, e.g. `(1, -1, 0)`.
pub(crate) fn tuple_string(v: &IVec) -> String {
    let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
    format!("({})", parts.join(", "))
}
