//! Exact DTW distance and warping path computation.
//!
//! The per-cell cost is the squared difference `(a[i] - b[j])^2` and the
//! reported distance is the accumulated cost `D[n][m]` of the optimal path,
//! without a final square root.

use tracing::instrument;

use crate::distance::DtwDistance;
use crate::error::DtwError;
use crate::path::{WarpingPath, WarpingStep};
use crate::series::TimeSeriesView;
use crate::window::{FullWindow, SearchWindow};

/// A sequence aligner producing a distance and, on demand, a warping path.
///
/// Implemented by exact [`Dtw`] and the multi-resolution
/// [`FastDtw`][crate::FastDtw]; callers that only score candidates depend on
/// this trait rather than on one algorithm.
pub trait Aligner: Send + Sync {
    /// Alignment cost between `a` and `b`.
    fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> DtwDistance;

    /// Alignment cost and the warping path achieving it.
    fn distance_and_path(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
    ) -> (DtwDistance, WarpingPath);
}

/// Exact, unconstrained DTW. Stateless, thread-safe and copyable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw;

impl Dtw {
    /// Create an exact DTW calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Aligner for Dtw {
    /// Compute the DTW distance using a rolling two-row buffer.
    ///
    /// Runs in O(n * m) time and O(m) space.
    #[instrument(level = "trace", skip_all, fields(n = a.len(), m = b.len()))]
    fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> DtwDistance {
        DtwDistance::new(rolling_cost(a.as_slice(), b.as_slice(), &FullWindow))
    }

    /// Compute the DTW distance and the optimal warping path.
    ///
    /// Allocates the full cost matrix plus a direction array for traceback.
    #[instrument(level = "trace", skip_all, fields(n = a.len(), m = b.len()))]
    fn distance_and_path(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
    ) -> (DtwDistance, WarpingPath) {
        let (cost, steps) = windowed_cost_and_path(a.as_slice(), b.as_slice(), &FullWindow);
        (DtwDistance::new(cost), WarpingPath::new(steps))
    }
}

/// Exact DTW between two raw sequences.
///
/// Returns the distance and a warping path whose indices are 0-based into `x`
/// and `y`, ordered from `(0, 0)` to `(len(x)-1, len(y)-1)`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::EmptySeries`] | `x` or `y` is empty |
/// | [`DtwError::NonFiniteValue`] | `x` or `y` holds NaN or infinity |
pub fn dtw(x: &[f64], y: &[f64]) -> Result<(DtwDistance, WarpingPath), DtwError> {
    let (x, y) = (TimeSeriesView::new(x)?, TimeSeriesView::new(y)?);
    Ok(Dtw.distance_and_path(x, y))
}

/// Exact DTW distance between two raw sequences, without path recovery.
///
/// This is the distance used for nearest-centroid assignment.
///
/// # Errors
///
/// Same conditions as [`dtw`].
pub fn alignment_distance(x: &[f64], y: &[f64]) -> Result<DtwDistance, DtwError> {
    let (x, y) = (TimeSeriesView::new(x)?, TimeSeriesView::new(y)?);
    Ok(Dtw.distance(x, y))
}

/// Read the accumulated cost of cell `col` from a row buffer laid out as
/// `[INF sentinel, start.., INF sentinel]`, returning INF outside the row.
#[inline]
fn buffered(row: &[f64], start: usize, col: usize) -> f64 {
    let slot = col.wrapping_sub(start).wrapping_add(1);
    if slot < row.len() {
        row[slot]
    } else {
        f64::INFINITY
    }
}

/// Rolling two-row DTW restricted to `window`; returns only the accumulated cost.
///
/// Each row buffer has `bw + 2` slots. Index 0 is the left sentinel and
/// index `bw + 1` the right sentinel, both INF. Cells outside the window
/// therefore read as unreachable.
pub(crate) fn rolling_cost<W: SearchWindow>(a: &[f64], b: &[f64], window: &W) -> f64 {
    let n = a.len();
    let m = b.len();
    let buf_width = window.band_width(n, m) + 2;

    let mut prev = vec![f64::INFINITY; buf_width];
    let mut curr = vec![f64::INFINITY; buf_width];
    let mut prev_start = 0usize;

    for i in 0..n {
        curr.fill(f64::INFINITY);
        let cols = window.column_range(i, m);
        let start = cols.start;

        for j in cols {
            let cost = (a[i] - b[j]).powi(2);
            let cj = j - start + 1;

            if i == 0 && j == 0 {
                curr[cj] = cost;
                continue;
            }

            let left = if j > start {
                curr[cj - 1]
            } else {
                f64::INFINITY
            };
            let (above, diag) = if i > 0 {
                let diag = if j > 0 {
                    buffered(&prev, prev_start, j - 1)
                } else {
                    f64::INFINITY
                };
                (buffered(&prev, prev_start, j), diag)
            } else {
                (f64::INFINITY, f64::INFINITY)
            };

            curr[cj] = cost + diag.min(above).min(left);
        }

        prev_start = start;
        std::mem::swap(&mut prev, &mut curr);
    }

    // After the final swap `prev` holds the last row.
    buffered(&prev, prev_start, m - 1)
}

/// Windowed DTW keeping every row, so the optimal path can be traced back.
///
/// Cell `(i, j)` lives at flat index `i * bw + (j - row_start(i))`. Direction
/// codes: 0 = diagonal, 1 = vertical (from `i-1`), 2 = horizontal (from
/// `j-1`). Ties resolve in that order.
pub(crate) fn windowed_cost_and_path<W: SearchWindow>(
    a: &[f64],
    b: &[f64],
    window: &W,
) -> (f64, Vec<WarpingStep>) {
    let n = a.len();
    let m = b.len();
    let bw = window.band_width(n, m);

    let mut cost = vec![f64::INFINITY; n * bw];
    let mut dirs = vec![0u8; n * bw];
    let mut starts = Vec::with_capacity(n);

    let lookup = |cost: &[f64], starts: &[usize], row: usize, col: usize| -> f64 {
        let start = starts[row];
        match col.checked_sub(start) {
            Some(local) if local < bw => cost[row * bw + local],
            _ => f64::INFINITY,
        }
    };

    for i in 0..n {
        let cols = window.column_range(i, m);
        starts.push(cols.start);

        for j in cols.clone() {
            let c = (a[i] - b[j]).powi(2);
            let idx = i * bw + (j - cols.start);

            if i == 0 && j == 0 {
                cost[idx] = c;
                continue;
            }

            let diag = if i > 0 && j > 0 {
                lookup(&cost, &starts, i - 1, j - 1)
            } else {
                f64::INFINITY
            };
            let above = if i > 0 {
                lookup(&cost, &starts, i - 1, j)
            } else {
                f64::INFINITY
            };
            let left = if j > cols.start {
                cost[idx - 1]
            } else {
                f64::INFINITY
            };

            let (min_val, dir) = if diag <= above && diag <= left {
                (diag, 0u8)
            } else if above <= left {
                (above, 1u8)
            } else {
                (left, 2u8)
            };

            cost[idx] = c + min_val;
            dirs[idx] = dir;
        }
    }

    let mut path = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n - 1, m - 1);
    loop {
        path.push(WarpingStep::new(i, j));
        if i == 0 && j == 0 {
            break;
        }
        match dirs[i * bw + (j - starts[i])] {
            0 => {
                i -= 1;
                j -= 1;
            }
            1 => i -= 1,
            _ => j -= 1,
        }
    }
    path.reverse();

    (lookup(&cost, &starts, n - 1, m - 1), path)
}
