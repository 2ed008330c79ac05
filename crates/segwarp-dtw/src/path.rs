//! Warping path types for DTW alignment.

/// A single cell on a warping path: index `a` in the first series aligned
/// with index `b` in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WarpingStep {
    /// Index in the first time series.
    pub a: usize,
    /// Index in the second time series.
    pub b: usize,
}

impl WarpingStep {
    /// Build a step from an index pair.
    #[must_use]
    pub const fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }
}

/// An ordered sequence of warping steps from `(0, 0)` to `(n-1, m-1)`.
///
/// Both coordinates are non-decreasing and every step advances at least one
/// coordinate by exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Indices into the first series, one per step (`w1`).
    #[must_use]
    pub fn first_indices(&self) -> Vec<usize> {
        self.0.iter().map(|s| s.a).collect()
    }

    /// Indices into the second series, one per step (`w2`).
    #[must_use]
    pub fn second_indices(&self) -> Vec<usize> {
        self.0.iter().map(|s| s.b).collect()
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the path invariants for series of length `n` and `m`: correct
    /// endpoints, monotone, and no skipped or stalled steps.
    #[must_use]
    pub fn is_valid_for(&self, n: usize, m: usize) -> bool {
        let (Some(first), Some(last)) = (self.0.first(), self.0.last()) else {
            return false;
        };
        if *first != WarpingStep::new(0, 0) || *last != WarpingStep::new(n - 1, m - 1) {
            return false;
        }
        self.0.windows(2).all(|pair| {
            let (prev, next) = (pair[0], pair[1]);
            next.a >= prev.a
                && next.b >= prev.b
                && next.a - prev.a <= 1
                && next.b - prev.b <= 1
                && (next.a - prev.a) + (next.b - prev.b) >= 1
        })
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(pairs: &[(usize, usize)]) -> WarpingPath {
        WarpingPath::new(pairs.iter().map(|&(a, b)| WarpingStep::new(a, b)).collect())
    }

    #[test]
    fn index_sequences() {
        let p = path(&[(0, 0), (1, 0), (2, 1)]);
        assert_eq!(p.first_indices(), vec![0, 1, 2]);
        assert_eq!(p.second_indices(), vec![0, 0, 1]);
    }

    #[test]
    fn valid_path_accepted() {
        assert!(path(&[(0, 0), (1, 1), (1, 2), (2, 3)]).is_valid_for(3, 4));
    }

    #[test]
    fn skipped_index_rejected() {
        assert!(!path(&[(0, 0), (2, 1)]).is_valid_for(3, 2));
    }

    #[test]
    fn wrong_endpoint_rejected() {
        assert!(!path(&[(0, 0), (1, 1)]).is_valid_for(3, 2));
    }

    #[test]
    fn empty_path_is_invalid() {
        assert!(!path(&[]).is_valid_for(1, 1));
    }
}
