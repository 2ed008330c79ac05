use segwarp_dtw::{DtwError, NormalizeError, ResampleError};

/// Errors from configuring or running the evolutionary centroid search.
#[derive(Debug, thiserror::Error)]
pub enum EvoError {
    /// Returned when the population size is zero.
    #[error("population size must be at least 1, got {pop_size}")]
    InvalidPopulationSize {
        /// The invalid population size.
        pop_size: usize,
    },

    /// Returned when a probability lies outside `[0, 1]` or is not finite.
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability {
        /// Name of the offending parameter.
        name: &'static str,
        /// The value provided.
        value: f64,
    },

    /// Returned when the batch size ratio lies outside `(0, 1]`.
    #[error("batch size ratio must lie in (0, 1], got {batch_size}")]
    InvalidBatchSize {
        /// The invalid ratio.
        batch_size: f64,
    },

    /// Returned when the tournament size is zero.
    #[error("tournament size must be at least 1, got {tournsize}")]
    InvalidTournamentSize {
        /// The invalid tournament size.
        tournsize: usize,
    },

    /// Returned when a mutation parameter is negative or not finite.
    #[error("mutation parameter {name} is invalid: {value}")]
    InvalidMutationParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The value provided.
        value: f64,
    },

    /// Returned when the mutation variant weights are negative or sum to zero.
    #[error("mutation variant weights must be non-negative with a positive sum, got {weights:?}")]
    InvalidVariantWeights {
        /// Lateral, smooth and extreme weights as provided.
        weights: [f64; 3],
    },

    /// Returned when the series set to average is empty.
    #[error("cannot compute a centroid of an empty series set")]
    EmptySeriesSet,

    /// Returned when an evaluation produces NaN or infinite fitness.
    #[error("non-finite fitness produced at generation {generation}")]
    NonFiniteFitness {
        /// Generation in which the value appeared.
        generation: usize,
    },

    /// Wraps an alignment error.
    #[error("alignment error: {0}")]
    Dtw(#[from] DtwError),

    /// Wraps a resampling error.
    #[error("resampling error: {0}")]
    Resample(#[from] ResampleError),

    /// Wraps a normalisation error.
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),
}
