//! Pooled z-score normalisation of a series set and its exact inverse.
//!
//! The transform maps `v` to `(mean - v) / std`, with `mean` and `std`
//! computed once over every value of every series. The negated orientation is
//! self-consistent: [`NormalizationStats::denormalize`] maps back with
//! `mean - std * v`.

use tracing::instrument;

use crate::error::NormalizeError;

/// Pooled mean and population standard deviation of a series set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationStats {
    mean: f64,
    std: f64,
}

impl NormalizationStats {
    /// Compute pooled statistics over every value of `set`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`NormalizeError::EmptySet`] | `set` holds no values |
    /// | [`NormalizeError::ZeroDeviation`] | every pooled value is identical |
    pub fn from_set<S: AsRef<[f64]>>(set: &[S]) -> Result<Self, NormalizeError> {
        let n_values: usize = set.iter().map(|s| s.as_ref().len()).sum();
        if n_values == 0 {
            return Err(NormalizeError::EmptySet);
        }
        let pooled = || set.iter().flat_map(|s| s.as_ref().iter().copied());
        let n = n_values as f64;
        let mean = pooled().sum::<f64>() / n;
        let variance = pooled().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let std = variance.sqrt();
        if std == 0.0 {
            return Err(NormalizeError::ZeroDeviation {
                n_values,
                value: mean,
            });
        }
        Ok(Self { mean, std })
    }

    /// Pooled mean.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Pooled population standard deviation.
    #[must_use]
    pub fn std(&self) -> f64 {
        self.std
    }

    /// Apply the forward transform to one series.
    #[must_use]
    pub fn normalize(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|v| (self.mean - v) / self.std).collect()
    }

    /// Apply the inverse transform to one series.
    #[must_use]
    pub fn denormalize(&self, series: &[f64]) -> Vec<f64> {
        series.iter().map(|v| self.mean - self.std * v).collect()
    }
}

/// Normalise a whole set with its pooled statistics.
///
/// # Errors
///
/// See [`NormalizationStats::from_set`].
#[instrument(level = "debug", skip_all, fields(n_series = set.len()))]
pub fn normalize<S: AsRef<[f64]>>(
    set: &[S],
) -> Result<(Vec<Vec<f64>>, NormalizationStats), NormalizeError> {
    let stats = NormalizationStats::from_set(set)?;
    let normalized = set.iter().map(|s| stats.normalize(s.as_ref())).collect();
    Ok((normalized, stats))
}

/// Invert [`normalize`] for a whole set.
#[must_use]
pub fn denormalize<S: AsRef<[f64]>>(set: &[S], stats: &NormalizationStats) -> Vec<Vec<f64>> {
    set.iter().map(|s| stats.denormalize(s.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_statistics() {
        let set = vec![vec![1.0, 3.0], vec![5.0, 7.0]];
        let stats = NormalizationStats::from_set(&set).unwrap();
        assert!((stats.mean() - 4.0).abs() < 1e-12);
        assert!((stats.std() - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn forward_transform_is_negated() {
        let set = vec![vec![0.0, 2.0]];
        let (norm, _) = normalize(&set).unwrap();
        assert_eq!(norm, vec![vec![1.0, -1.0]]);
    }

    #[test]
    fn round_trip_recovers_input() {
        let set = vec![vec![1.5, -2.0, 8.25], vec![0.0], vec![3.0, 3.0, 4.0, 100.0]];
        let (norm, stats) = normalize(&set).unwrap();
        let back = denormalize(&norm, &stats);
        for (orig, rec) in set.iter().zip(&back) {
            assert_eq!(orig.len(), rec.len());
            for (a, b) in orig.iter().zip(rec) {
                assert!((a - b).abs() < 1e-9, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn constant_set_is_rejected() {
        let set = vec![vec![2.0, 2.0], vec![2.0]];
        assert!(matches!(
            normalize(&set),
            Err(NormalizeError::ZeroDeviation { n_values: 3, .. })
        ));
    }

    #[test]
    fn empty_set_is_rejected() {
        let set: Vec<Vec<f64>> = vec![vec![]];
        assert!(matches!(normalize(&set), Err(NormalizeError::EmptySet)));
    }
}
