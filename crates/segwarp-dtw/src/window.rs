//! Search windows restricting which cells of the DTW cost matrix are visited.

use std::ops::Range;

use crate::path::WarpingStep;

/// A per-row contiguous set of admissible columns in the cost matrix.
///
/// Every row range must be non-empty, row 0 must contain column 0, the last
/// row must contain column `m - 1`, and each row must start no later than one
/// past the end of the previous row so that a monotone path exists.
pub trait SearchWindow {
    /// Admissible columns of `row` in a matrix with `n_cols` columns.
    fn column_range(&self, row: usize, n_cols: usize) -> Range<usize>;

    /// Widest row range for an `n x m` matrix, used to size row buffers.
    fn band_width(&self, n: usize, m: usize) -> usize;
}

/// The unconstrained window: every cell of the cost matrix is admissible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullWindow;

impl SearchWindow for FullWindow {
    fn column_range(&self, _row: usize, n_cols: usize) -> Range<usize> {
        0..n_cols
    }

    fn band_width(&self, _n: usize, m: usize) -> usize {
        m
    }
}

/// Window obtained by projecting a coarse-resolution warping path onto the
/// next finer resolution and widening it by `radius` coarse cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedWindow {
    rows: Vec<Range<usize>>,
    width: usize,
}

impl ProjectedWindow {
    /// Project `coarse_path` (computed on series halved in length) onto an
    /// `n x m` matrix.
    ///
    /// Each coarse cell `(i, j)` expands to the `radius` neighbourhood around
    /// it, and each coarse cell of that neighbourhood covers the fine cells
    /// `{2i, 2i+1} x {2j, 2j+1}`. Rows are then stitched so that each row can be
    /// entered from the end of the previous one by a vertical or diagonal move,
    /// and the corners `(0, 0)` and `(n-1, m-1)` are admitted.
    #[must_use]
    pub fn project(coarse_path: &[WarpingStep], n: usize, m: usize, radius: usize) -> Self {
        let mut lo = vec![usize::MAX; n];
        let mut hi = vec![0usize; n];

        for step in coarse_path {
            let col_lo = (2 * step.b.saturating_sub(radius)).min(m - 1);
            let col_hi = (2 * (step.b + radius) + 1).min(m - 1);
            for coarse_row in step.a.saturating_sub(radius)..=step.a + radius {
                for row in [2 * coarse_row, 2 * coarse_row + 1] {
                    if row < n {
                        lo[row] = lo[row].min(col_lo);
                        hi[row] = hi[row].max(col_hi);
                    }
                }
            }
        }

        lo[0] = 0;
        let mut rows = Vec::with_capacity(n);
        let mut width = 1;
        for row in 0..n {
            if lo[row] == usize::MAX {
                // Row not reached by the projection (odd-length tail).
                let carry = if row == 0 { 0 } else { hi[row - 1] };
                lo[row] = carry;
                hi[row] = carry;
            }
            if row > 0 {
                lo[row] = lo[row].min(hi[row - 1] + 1);
                hi[row] = hi[row].max(hi[row - 1]);
            }
            if row == n - 1 {
                hi[row] = m - 1;
            }
            width = width.max(hi[row] - lo[row] + 1);
            rows.push(lo[row]..hi[row] + 1);
        }

        Self { rows, width }
    }

    /// Number of admissible cells, a measure of the work a windowed pass does.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(ExactSizeIterator::len).sum()
    }
}

impl SearchWindow for ProjectedWindow {
    fn column_range(&self, row: usize, _n_cols: usize) -> Range<usize> {
        self.rows[row].clone()
    }

    fn band_width(&self, _n: usize, _m: usize) -> usize {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_window_covers_every_column() {
        assert_eq!(FullWindow.column_range(0, 10), 0..10);
        assert_eq!(FullWindow.column_range(5, 10), 0..10);
        assert_eq!(FullWindow.band_width(4, 10), 10);
    }

    #[test]
    fn projection_of_diagonal_covers_corners() {
        let coarse: Vec<WarpingStep> = (0..3).map(|i| WarpingStep::new(i, i)).collect();
        let w = ProjectedWindow::project(&coarse, 6, 6, 0);
        assert!(w.column_range(0, 6).contains(&0));
        assert!(w.column_range(5, 6).contains(&5));
        assert_eq!(w.column_range(2, 6), 2..4);
    }

    #[test]
    fn projection_covers_odd_tail_row() {
        let coarse: Vec<WarpingStep> = (0..2).map(|i| WarpingStep::new(i, i)).collect();
        let w = ProjectedWindow::project(&coarse, 5, 5, 0);
        let last = w.column_range(4, 5);
        assert!(last.contains(&4), "last row {last:?} must reach the final column");
    }

    #[test]
    fn projected_rows_overlap() {
        let coarse = vec![
            WarpingStep::new(0, 0),
            WarpingStep::new(0, 1),
            WarpingStep::new(0, 2),
            WarpingStep::new(1, 3),
        ];
        let w = ProjectedWindow::project(&coarse, 4, 8, 0);
        for row in 1..4 {
            let prev = w.column_range(row - 1, 8);
            let cur = w.column_range(row, 8);
            assert!(cur.start <= prev.end, "row {row} {cur:?} disconnected from {prev:?}");
        }
    }

    #[test]
    fn radius_widens_projection() {
        let coarse: Vec<WarpingStep> = (0..4).map(|i| WarpingStep::new(i, i)).collect();
        let narrow = ProjectedWindow::project(&coarse, 8, 8, 0);
        let wide = ProjectedWindow::project(&coarse, 8, 8, 1);
        assert!(wide.cell_count() > narrow.cell_count());
    }
}
