use segwarp_dtw::DtwError;
use segwarp_evo::EvoError;

/// Errors from nearest-centroid fitting and classification.
#[derive(Debug, thiserror::Error)]
pub enum NcError {
    /// Returned when prediction is requested before any centroid exists.
    #[error("no centroids available, fit the classifier first")]
    NotFitted,

    /// Returned when `fit` receives no series.
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    /// Returned when the number of labels differs from the number of series.
    #[error("got {n_labels} labels for {n_series} series")]
    LabelCountMismatch {
        /// Number of series provided.
        n_series: usize,
        /// Number of labels provided.
        n_labels: usize,
    },

    /// Returned when accuracy is requested on an empty test set.
    #[error("cannot score an empty test set")]
    EmptyTestSet,

    /// Returned when every centroid lies at distance zero from a series, so
    /// memberships cannot be normalised.
    #[error("series {index} has zero total distance to every centroid")]
    ZeroTotalDistance {
        /// Position of the series in the input.
        index: usize,
    },

    /// Wraps a centroid search error.
    #[error("centroid search failed: {0}")]
    Evo(#[from] EvoError),

    /// Wraps an alignment error.
    #[error("alignment error: {0}")]
    Dtw(#[from] DtwError),
}
