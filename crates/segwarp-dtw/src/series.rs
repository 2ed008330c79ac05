//! Validated time series for centroid search.
//!
//! Every class in a dataset is a set of series of possibly different lengths.
//! The set is validated once on entry ([`TimeSeries::collect_from`]) and the
//! alignment code then borrows [`TimeSeriesView`]s without re-checking.

use std::ops::Index;

use crate::error::DtwError;

/// Return the index of the first non-finite value, if any.
fn first_non_finite(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !v.is_finite())
}

/// One member of a class: non-empty, every value finite.
///
/// Members of the same class may differ in length. The first member's length
/// fixes the length of candidate centroids.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries(Vec<f64>);

impl TimeSeries {
    /// Wrap `values` as a class member.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `values` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, DtwError> {
        if values.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        if let Some(index) = first_non_finite(&values) {
            return Err(DtwError::NonFiniteValue { index });
        }
        Ok(Self(values))
    }

    /// Validate a whole class in input order, copying each member.
    ///
    /// # Errors
    ///
    /// Returns the error of the first invalid member. Its position is not
    /// reported.
    pub fn collect_from<S: AsRef<[f64]>>(set: &[S]) -> Result<Vec<Self>, DtwError> {
        set.iter().map(|s| Self::new(s.as_ref().to_vec())).collect()
    }

    /// Borrow as an alignment input.
    #[must_use]
    pub fn as_view(&self) -> TimeSeriesView<'_> {
        TimeSeriesView::new_unchecked(&self.0)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Smallest sample. Pooled over a class, this is the lower bound for
    /// uniformly generated individuals.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest sample; the matching upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl AsRef<[f64]> for TimeSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Borrowed alignment input. Candidates and class members are both aligned
/// through this type.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesView<'a>(&'a [f64]);

impl<'a> TimeSeriesView<'a> {
    /// Check `slice` and borrow it.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `slice` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(slice: &'a [f64]) -> Result<Self, DtwError> {
        if slice.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        if let Some(index) = first_non_finite(slice) {
            return Err(DtwError::NonFiniteValue { index });
        }
        Ok(Self(slice))
    }

    /// Borrow a slice already known to be non-empty and finite.
    pub(crate) fn new_unchecked(slice: &'a [f64]) -> Self {
        Self(slice)
    }

    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for TimeSeriesView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[f64]> for TimeSeriesView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}
