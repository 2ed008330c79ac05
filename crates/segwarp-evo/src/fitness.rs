//! Sum-of-squared-alignment-distance fitness.

use segwarp_dtw::{Aligner, Dtw, FastDtw, TimeSeriesView};

use crate::error::EvoError;
use crate::individual::Fitness;
use crate::operators::Evaluate;

/// Fitness under exact DTW: `sum over s of dtw(s, candidate)^2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DtwFitness;

impl Evaluate for DtwFitness {
    fn evaluate(&self, candidate: TimeSeriesView<'_>, series: &[TimeSeriesView<'_>]) -> Fitness {
        sum_squared(&Dtw, candidate, series)
    }
}

/// Fitness under FastDTW, with a radius proportional to the length of the
/// first evaluation series: `max(1, floor(len * window_ratio))`.
#[derive(Debug, Clone, Copy)]
pub struct FastDtwFitness {
    window_ratio: f64,
}

impl FastDtwFitness {
    /// Create the evaluator with the given radius ratio.
    #[must_use]
    pub fn new(window_ratio: f64) -> Self {
        Self { window_ratio }
    }

    /// Search radius used against a set whose first series has `reference_len` values.
    #[must_use]
    pub fn radius(&self, reference_len: usize) -> usize {
        ((reference_len as f64 * self.window_ratio) as usize).max(1)
    }
}

impl Default for FastDtwFitness {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl Evaluate for FastDtwFitness {
    fn evaluate(&self, candidate: TimeSeriesView<'_>, series: &[TimeSeriesView<'_>]) -> Fitness {
        let reference_len = series.first().map_or(0, TimeSeriesView::len);
        let aligner = FastDtw::new(self.radius(reference_len));
        sum_squared(&aligner, candidate, series)
    }
}

fn sum_squared<A: Aligner>(
    aligner: &A,
    candidate: TimeSeriesView<'_>,
    series: &[TimeSeriesView<'_>],
) -> Fitness {
    let total = series
        .iter()
        .map(|&s| aligner.distance(s, candidate).squared())
        .sum();
    Fitness::new(total)
}

/// Exact-DTW fitness of a raw candidate against a raw series set.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`EvoError::Dtw`] | the candidate or a series is empty or holds a non-finite value |
pub fn fitness<S: AsRef<[f64]>>(candidate: &[f64], series: &[S]) -> Result<Fitness, EvoError> {
    let candidate = TimeSeriesView::new(candidate)?;
    let views = series
        .iter()
        .map(|s| TimeSeriesView::new(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DtwFitness.evaluate(candidate, &views))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_set_scores_zero() {
        let s = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let set = vec![s.clone(), s.clone(), s.clone()];
        assert_eq!(fitness(&s, &set).unwrap().value(), 0.0);
    }

    #[test]
    fn distances_are_squared_and_summed() {
        // dtw([0], [1]) = 1, dtw([0], [2]) = 4; fitness = 1 + 16.
        let set = vec![vec![1.0], vec![2.0]];
        assert_eq!(fitness(&[0.0], &set).unwrap().value(), 17.0);
    }

    #[test]
    fn fast_radius_is_proportional() {
        let f = FastDtwFitness::default();
        assert_eq!(f.radius(50), 1);
        assert_eq!(f.radius(450), 4);
    }

    #[test]
    fn fast_fitness_bounds_exact() {
        let series: Vec<Vec<f64>> = (0..4)
            .map(|k| (0..120).map(|i| (i as f64 * 0.1 + k as f64).sin()).collect())
            .collect();
        let candidate: Vec<f64> = (0..110).map(|i| (i as f64 * 0.11).sin()).collect();
        let views: Vec<_> = series.iter().map(|s| TimeSeriesView::new(s).unwrap()).collect();
        let c = TimeSeriesView::new(&candidate).unwrap();
        let exact = DtwFitness.evaluate(c, &views).value();
        let fast = FastDtwFitness::new(0.01).evaluate(c, &views).value();
        assert!(fast >= exact - 1e-9);
    }

    #[test]
    fn non_finite_candidate_rejected() {
        let set = vec![vec![1.0]];
        assert!(matches!(fitness(&[f64::NAN], &set), Err(EvoError::Dtw(_))));
    }
}
