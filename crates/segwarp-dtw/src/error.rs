//! Error types for alignment, resampling, and normalization.

/// Errors from DTW / FastDTW alignment and time series validation.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when an empty slice is provided as a time series.
    #[error("time series must be non-empty")]
    EmptySeries,

    /// Returned when a time series contains NaN, infinity, or negative infinity.
    #[error("time series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },
}

/// Errors from linear-interpolation resampling.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResampleError {
    /// Returned when the sequence to resample is empty.
    #[error("cannot resample an empty sequence")]
    EmptyInput,

    /// Returned when the requested output length is zero.
    #[error("target length must be at least 1")]
    ZeroTargetLength,
}

/// Errors from pooled z-score normalization.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// Returned when the series set holds no values at all.
    #[error("cannot normalize an empty series set")]
    EmptySet,

    /// Returned when every pooled value is identical, so the standard deviation is zero.
    #[error("pooled standard deviation is zero ({n_values} values all equal to {value})")]
    ZeroDeviation {
        /// Number of pooled values.
        n_values: usize,
        /// The constant value shared by every element.
        value: f64,
    },
}
