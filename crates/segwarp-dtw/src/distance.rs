//! DTW distance newtype wrapper.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative DTW distance: the accumulated squared-difference cost of the
/// optimal warping path (no final square root is taken).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DtwDistance(f64);

impl DtwDistance {
    /// Distance between series with no admissible alignment.
    pub const INFINITY: Self = Self(f64::INFINITY);

    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return the square of the distance, the per-series term of the fitness sum.
    #[must_use]
    pub fn squared(self) -> f64 {
        self.0 * self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for DtwDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DtwDistance::new(1.234567)), "1.234567");
    }

    #[test]
    fn squared_value() {
        assert_eq!(DtwDistance::new(3.0).squared(), 9.0);
    }

    #[test]
    fn total_cmp_ordering() {
        let a = DtwDistance::new(1.0);
        let b = DtwDistance::new(2.0);
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(b.total_cmp(&a), Ordering::Greater);
        assert_eq!(DtwDistance::INFINITY.total_cmp(&b), Ordering::Greater);
    }
}
