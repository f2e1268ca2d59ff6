//! Named indeterminates.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A named indeterminate such as `X3` or `b7`.
///
/// Ordering is "natural": names are split into an alphabetic stem and a
/// trailing decimal index, so `X2 < X10`. Names without an index sort by stem.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }

    fn split_index(&self) -> (&str, Option<u64>) {
        let name = self.name();
        let stem_len = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (stem, digits) = name.split_at(stem_len);
        (stem, digits.parse().ok())
    }
}

/// `prefix0, prefix1, ..., prefix{count-1}`.
pub fn symbols(prefix: &str, count: usize) -> Vec<Symbol> {
    (0..count).map(|i| Symbol::new(format!("{prefix}{i}"))).collect()
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        let (stem_a, idx_a) = self.split_index();
        let (stem_b, idx_b) = other.split_index();
        stem_a
            .cmp(stem_b)
            .then_with(|| idx_a.cmp(&idx_b))
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
