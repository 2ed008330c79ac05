//! FastDTW: multi-resolution approximate DTW (Salvador & Chan, 2007).
//!
//! Both series are halved by pairwise averaging until one of them is no longer
//! than `radius + 2`, exact DTW runs at that coarsest level, and the resulting
//! path is projected back up one level at a time. At each finer level DTW is
//! only evaluated inside the projected path widened by `radius` cells.

use tracing::instrument;

use crate::distance::DtwDistance;
use crate::dtw::{Aligner, rolling_cost, windowed_cost_and_path};
use crate::error::DtwError;
use crate::path::{WarpingPath, WarpingStep};
use crate::series::TimeSeriesView;
use crate::window::{FullWindow, ProjectedWindow};

/// Approximate DTW with a configurable search radius.
///
/// A radius at least `max(len(a), len(b))` reduces to exact DTW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastDtw {
    radius: usize,
}

impl FastDtw {
    /// Create a FastDTW aligner with the given search radius.
    #[must_use]
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    /// Return the search radius.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    fn is_base_case(&self, n: usize, m: usize) -> bool {
        let min_size = self.radius + 2;
        n <= min_size || m <= min_size
    }

    /// Window for the full-resolution pass, derived from the path one level down.
    fn refine_window(&self, a: &[f64], b: &[f64]) -> ProjectedWindow {
        let (coarse_a, coarse_b) = (coarsen(a), coarsen(b));
        let (_, coarse_path) = self.align(&coarse_a, &coarse_b);
        ProjectedWindow::project(&coarse_path, a.len(), b.len(), self.radius)
    }

    fn align(&self, a: &[f64], b: &[f64]) -> (f64, Vec<WarpingStep>) {
        if self.is_base_case(a.len(), b.len()) {
            return windowed_cost_and_path(a, b, &FullWindow);
        }
        let window = self.refine_window(a, b);
        windowed_cost_and_path(a, b, &window)
    }
}

impl Aligner for FastDtw {
    #[instrument(level = "trace", skip_all, fields(n = a.len(), m = b.len(), radius = self.radius))]
    fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> DtwDistance {
        let (a, b) = (a.as_slice(), b.as_slice());
        // The top level needs no path, so it can use the rolling buffer.
        let cost = if self.is_base_case(a.len(), b.len()) {
            rolling_cost(a, b, &FullWindow)
        } else {
            rolling_cost(a, b, &self.refine_window(a, b))
        };
        DtwDistance::new(cost)
    }

    #[instrument(level = "trace", skip_all, fields(n = a.len(), m = b.len(), radius = self.radius))]
    fn distance_and_path(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
    ) -> (DtwDistance, WarpingPath) {
        let (cost, steps) = self.align(a.as_slice(), b.as_slice());
        (DtwDistance::new(cost), WarpingPath::new(steps))
    }
}

/// FastDTW between two raw sequences.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptySeries`] | `x` or `y` is empty |
/// | [`DtwError::NonFiniteValue`] | `x` or `y` holds NaN or infinity |
pub fn fastdtw(
    x: &[f64],
    y: &[f64],
    radius: usize,
) -> Result<(DtwDistance, WarpingPath), DtwError> {
    let (x, y) = (TimeSeriesView::new(x)?, TimeSeriesView::new(y)?);
    Ok(FastDtw::new(radius).distance_and_path(x, y))
}

/// Halve a series by averaging adjacent pairs. A trailing odd element is dropped.
fn coarsen(x: &[f64]) -> Vec<f64> {
    x.chunks_exact(2).map(|pair| (pair[0] + pair[1]) / 2.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtw::{Dtw, dtw};

    fn wave(n: usize, phase: f64) -> Vec<f64> {
        (0..n).map(|i| (i as f64 * 0.15 + phase).sin()).collect()
    }

    #[test]
    fn coarsen_halves_and_drops_odd_tail() {
        assert_eq!(coarsen(&[1.0, 3.0, 5.0, 7.0, 9.0]), vec![2.0, 6.0]);
    }

    #[test]
    fn large_radius_is_exact() {
        let x = wave(40, 0.0);
        let y = wave(33, 0.7);
        let (exact, exact_path) = dtw(&x, &y).unwrap();
        let (approx, approx_path) = fastdtw(&x, &y, 40).unwrap();
        assert_eq!(exact.value(), approx.value());
        assert_eq!(exact_path, approx_path);
    }

    #[test]
    fn small_radius_never_beats_exact() {
        let x = wave(120, 0.0);
        let y = wave(97, 1.3);
        let exact = dtw(&x, &y).unwrap().0.value();
        for radius in [0, 1, 2, 5] {
            let approx = fastdtw(&x, &y, radius).unwrap().0.value();
            assert!(approx >= exact - 1e-9, "radius {radius}: {approx} < {exact}");
        }
    }

    #[test]
    fn path_is_valid_at_every_radius() {
        let x = wave(75, 0.2);
        let y = wave(64, 2.0);
        for radius in [0, 1, 3, 10] {
            let (_, path) = fastdtw(&x, &y, radius).unwrap();
            assert!(path.is_valid_for(75, 64), "invalid path at radius {radius}");
        }
    }

    #[test]
    fn rolling_distance_matches_path_distance() {
        let x = wave(90, 0.0);
        let y = wave(81, 0.4);
        let aligner = FastDtw::new(2);
        let xs = TimeSeriesView::new(&x).unwrap();
        let ys = TimeSeriesView::new(&y).unwrap();
        let d = aligner.distance(xs, ys).value();
        let (dp, _) = aligner.distance_and_path(xs, ys);
        assert!((d - dp.value()).abs() < 1e-9);
    }

    #[test]
    fn self_distance_zero() {
        let x = wave(64, 0.0);
        assert_eq!(fastdtw(&x, &x, 1).unwrap().0.value(), 0.0);
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(fastdtw(&[], &[1.0, 2.0], 1), Err(DtwError::EmptySeries)));
    }

    #[test]
    fn single_element_against_long_series() {
        let x = [0.5];
        let y = wave(50, 0.0);
        let exact = Dtw
            .distance(TimeSeriesView::new(&x).unwrap(), TimeSeriesView::new(&y).unwrap())
            .value();
        assert_eq!(fastdtw(&x, &y, 0).unwrap().0.value(), exact);
    }
}
