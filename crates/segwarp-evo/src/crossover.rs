//! Alignment-driven segment crossover.
//!
//! Two parents are aligned with exact DTW and the warping path is cut into
//! alignment segments at the points where it enters or leaves a plateau (a run
//! where one of the two indices repeats). A random span of whole segments is
//! then exchanged between the parents, each exchanged slice resampled to the
//! length of the slice it replaces.

use rand::{Rng, RngCore};
use tracing::trace;

use segwarp_dtw::{Aligner, Dtw, TimeSeriesView, interpolate};

use crate::error::EvoError;
use crate::individual::Individual;
use crate::operators::Mate;

/// An inclusive run `[start, end]` of warping-path positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment {
    /// First path position of the segment.
    pub start: usize,
    /// Last path position of the segment.
    pub end: usize,
}

/// Partition a warping path, given as its two index sequences, into
/// alignment segments.
///
/// Interior position `i` opens a new segment when both indices just advanced
/// and the next step repeats one of them (entering a plateau), or when both
/// indices are about to advance and the current step repeated one of them
/// (leaving a plateau). Paths shorter than three steps and paths with no
/// plateau form a single segment.
#[must_use]
pub fn alignment_segments(w1: &[usize], w2: &[usize]) -> Vec<PathSegment> {
    let len = w1.len().min(w2.len());
    if len == 0 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut start = 0;
    for i in 1..len.saturating_sub(1) {
        let advanced = w1[i] != w1[i - 1] && w2[i] != w2[i - 1];
        let next_repeats = w1[i] == w1[i + 1] || w2[i] == w2[i + 1];
        let will_advance = w1[i] != w1[i + 1] && w2[i] != w2[i + 1];
        let repeated = w1[i] == w1[i - 1] || w2[i] == w2[i - 1];

        if (advanced && next_repeats) || (will_advance && repeated) {
            segments.push(PathSegment { start, end: i - 1 });
            start = i;
        }
    }
    segments.push(PathSegment {
        start,
        end: len - 1,
    });
    segments
}

/// Crossover exchanging a random span of alignment segments between two parents.
///
/// Children keep their parents' lengths.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentCrossover;

impl SegmentCrossover {
    /// Create the crossover operator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Mate for SegmentCrossover {
    fn mate(
        &self,
        first: &mut Individual,
        second: &mut Individual,
        rng: &mut dyn RngCore,
    ) -> Result<(), EvoError> {
        let (_, path) = Dtw.distance_and_path(
            TimeSeriesView::new(first.values())?,
            TimeSeriesView::new(second.values())?,
        );
        let (w1, w2) = (path.first_indices(), path.second_indices());
        let segments = alignment_segments(&w1, &w2);

        let mut c1 = rng.gen_range(0..segments.len());
        let mut c2 = rng.gen_range(0..segments.len());
        if c1 > c2 {
            std::mem::swap(&mut c1, &mut c2);
        }

        let (pi, pf) = (segments[c1].start, segments[c2].end);
        let (pi1, pf1) = (w1[pi], w1[pf] + 1);
        let (pi2, pf2) = (w2[pi], w2[pf] + 1);
        trace!(
            n_segments = segments.len(),
            first_span = ?(pi1..pf1),
            second_span = ?(pi2..pf2),
            "exchanging aligned span"
        );

        let into_first = interpolate(&second.values()[pi2..pf2], pf1 - pi1)?;
        let into_second = interpolate(&first.values()[pi1..pf1], pf2 - pi2)?;

        first.set_values(splice(first.values(), pi1..pf1, &into_first));
        second.set_values(splice(second.values(), pi2..pf2, &into_second));
        Ok(())
    }
}

/// Copy of `values` with `range` replaced by `replacement`.
fn splice(values: &[f64], range: std::ops::Range<usize>, replacement: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() - range.len() + replacement.len());
    out.extend_from_slice(&values[..range.start]);
    out.extend_from_slice(replacement);
    out.extend_from_slice(&values[range.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn segments_split_at_plateau_edges() {
        let w1 = [0, 1, 1, 1, 2, 3];
        let w2 = [0, 1, 2, 3, 4, 5];
        let segments = alignment_segments(&w1, &w2);
        assert_eq!(
            segments,
            vec![
                PathSegment { start: 0, end: 0 },
                PathSegment { start: 1, end: 2 },
                PathSegment { start: 3, end: 5 },
            ]
        );
    }

    #[test]
    fn diagonal_path_is_one_segment() {
        let w: Vec<usize> = (0..6).collect();
        assert_eq!(alignment_segments(&w, &w), vec![PathSegment { start: 0, end: 5 }]);
    }

    #[test]
    fn short_paths_are_one_segment() {
        assert_eq!(alignment_segments(&[0], &[0]), vec![PathSegment { start: 0, end: 0 }]);
        assert_eq!(
            alignment_segments(&[0, 1], &[0, 0]),
            vec![PathSegment { start: 0, end: 1 }]
        );
    }

    #[test]
    fn segments_cover_path_contiguously() {
        let w1 = [0, 0, 1, 2, 2, 2, 3, 4, 5, 5];
        let w2 = [0, 1, 2, 3, 4, 5, 6, 6, 7, 8];
        let segments = alignment_segments(&w1, &w2);
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments.last().map(|s| s.end), Some(w1.len() - 1));
        for pair in segments.windows(2) {
            assert_eq!(pair[1].start, pair[0].end + 1);
        }
    }

    #[test]
    fn children_keep_parent_lengths() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for trial in 0..50 {
            let n1 = 5 + trial % 11;
            let n2 = 3 + (trial * 7) % 17;
            let mut a = Individual::new((0..n1).map(|i| (i as f64 * 0.4).sin()).collect());
            let mut b = Individual::new((0..n2).map(|i| (i as f64 * 0.3).cos()).collect());
            SegmentCrossover.mate(&mut a, &mut b, &mut rng).unwrap();
            assert_eq!(a.len(), n1);
            assert_eq!(b.len(), n2);
            assert!(!a.is_evaluated() && !b.is_evaluated());
        }
    }

    #[test]
    fn single_value_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut a = Individual::new(vec![1.0]);
        let mut b = Individual::new(vec![2.0, 3.0, 4.0]);
        SegmentCrossover.mate(&mut a, &mut b, &mut rng).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn splice_replaces_range() {
        assert_eq!(splice(&[1.0, 2.0, 3.0, 4.0], 1..3, &[9.0]), vec![1.0, 9.0, 4.0]);
    }
}
