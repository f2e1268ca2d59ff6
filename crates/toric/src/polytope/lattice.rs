//! Bounded lattice-point search over the vertex bounding box.

use std::iter::FusedIterator;

use super::types::{IVec, Polytope};

/// Iterator over the lattice points of a [`Polytope`].
///
/// Walks the integer box `∏ [lo_i, hi_i]` like an odometer (last coordinate
/// fastest) and yields the points that satisfy every halfspace.
#[derive(Clone, Debug)]
pub struct LatticePoints<'a> {
    polytope: &'a Polytope,
    lo: IVec,
    hi: IVec,
    cursor: Option<IVec>,
}

impl<'a> LatticePoints<'a> {
    pub(crate) fn new(polytope: &'a Polytope) -> Self {
        let (lo, hi) = polytope.bounding_box();
        Self {
            polytope,
            cursor: Some(lo.clone()),
            lo,
            hi,
        }
    }

    fn successor(&self, p: &IVec) -> Option<IVec> {
        let mut q = p.clone();
        for i in (0..q.len()).rev() {
            if q[i] < self.hi[i] {
                q[i] += 1;
                return Some(q);
            }
            q[i] = self.lo[i];
        }
        None
    }
}

impl Iterator for LatticePoints<'_> {
    type Item = IVec;

    fn next(&mut self) -> Option<IVec> {
        loop {
            let current = self.cursor.take()?;
            self.cursor = self.successor(&current);
            if self.polytope.contains(&current) {
                return Some(current);
            }
        }
    }
}

impl FusedIterator for LatticePoints<'_> {}
