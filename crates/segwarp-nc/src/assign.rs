//! Assignment of series to externally supplied centroids.

use rayon::prelude::*;
use tracing::instrument;

use segwarp_dtw::{Aligner, Dtw, TimeSeriesView};

use crate::error::NcError;

fn views<S: AsRef<[f64]>>(set: &[S]) -> Result<Vec<TimeSeriesView<'_>>, NcError> {
    set.iter()
        .map(|s| TimeSeriesView::new(s.as_ref()).map_err(NcError::from))
        .collect()
}

/// DTW cost from every series to every centroid, one row per series.
fn distance_rows<C, S>(centroids: &[C], series: &[S]) -> Result<Vec<Vec<f64>>, NcError>
where
    C: AsRef<[f64]>,
    S: AsRef<[f64]>,
{
    if centroids.is_empty() {
        return Err(NcError::NotFitted);
    }
    let centroids = views(centroids)?;
    let series = views(series)?;
    Ok(series
        .par_iter()
        .map(|&s| centroids.iter().map(|&c| Dtw.distance(s, c).value()).collect())
        .collect())
}

/// Index of the nearest centroid for each series. Ties go to the lowest index.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`NcError::NotFitted`] | `centroids` is empty |
/// | [`NcError::Dtw`] | a centroid or series is empty or holds a non-finite value |
#[instrument(skip_all, fields(n_centroids = centroids.len(), n_series = series.len()))]
pub fn predict_with<C, S>(centroids: &[C], series: &[S]) -> Result<Vec<usize>, NcError>
where
    C: AsRef<[f64]>,
    S: AsRef<[f64]>,
{
    let rows = distance_rows(centroids, series)?;
    Ok(rows
        .iter()
        .map(|row| {
            let mut best = 0usize;
            for (c, &d) in row.iter().enumerate() {
                if d < row[best] {
                    best = c;
                }
            }
            best
        })
        .collect())
}

/// Membership of each series in every centroid's class, in centroid order.
///
/// # Errors
///
/// As [`predict_with`], plus [`NcError::ZeroTotalDistance`] from [`memberships`].
#[instrument(skip_all, fields(n_centroids = centroids.len(), n_series = series.len()))]
pub fn fuzzy_predict_with<C, S>(centroids: &[C], series: &[S]) -> Result<Vec<Vec<f64>>, NcError>
where
    C: AsRef<[f64]>,
    S: AsRef<[f64]>,
{
    distance_rows(centroids, series)?
        .iter()
        .enumerate()
        .map(|(index, row)| {
            memberships(row).map_err(|e| match e {
                NcError::ZeroTotalDistance { .. } => NcError::ZeroTotalDistance { index },
                other => other,
            })
        })
        .collect()
}

/// Turn distances to each class centroid into memberships summing to one.
///
/// Each class gets `1 - d / sum(d)`, then the beliefs are renormalised. A
/// single class always has membership 1.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`NcError::NotFitted`] | `distances` is empty |
/// | [`NcError::ZeroTotalDistance`] | more than one class and `sum(d) == 0` |
pub fn memberships(distances: &[f64]) -> Result<Vec<f64>, NcError> {
    match distances.len() {
        0 => return Err(NcError::NotFitted),
        1 => return Ok(vec![1.0]),
        _ => {}
    }
    let total: f64 = distances.iter().sum();
    if total == 0.0 {
        return Err(NcError::ZeroTotalDistance { index: 0 });
    }
    let beliefs: Vec<f64> = distances.iter().map(|d| 1.0 - d / total).collect();
    // Beliefs sum to k - 1.
    let belief_total: f64 = beliefs.iter().sum();
    Ok(beliefs.into_iter().map(|b| b / belief_total).collect())
}
