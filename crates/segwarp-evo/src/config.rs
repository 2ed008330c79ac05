//! Configuration builder for the evolutionary centroid search.

use tracing::instrument;

use crate::centroid::{CentroidResult, compute_centroid};
use crate::error::EvoError;

/// How candidate centroids are scored against the evaluation set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitnessMode {
    /// Exact DTW (default).
    Exact,
    /// FastDTW with `radius = max(1, floor(len(S[0]) * window_ratio))`.
    Fast {
        /// Radius as a fraction of the first evaluation series' length.
        window_ratio: f64,
    },
}

/// Parameters of the three segment mutations.
///
/// # Defaults
///
/// | Parameter       | Default           |
/// |-----------------|-------------------|
/// | `mu`            | 0.0               |
/// | `sigma`         | 0.03              |
/// | `sigma_extreme` | 0.3               |
/// | `desp_ratio`    | 0.04              |
/// | `weights`       | `[0.4, 0.4, 0.2]` |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationParams {
    /// Mean of both vertical shifts.
    pub mu: f64,
    /// Standard deviation of the smooth vertical shift.
    pub sigma: f64,
    /// Standard deviation of the extreme vertical shift.
    pub sigma_extreme: f64,
    /// Maximum lateral displacement as a fraction of the reference series length.
    pub desp_ratio: f64,
    /// Relative weights of the lateral, smooth and extreme variants.
    pub weights: [f64; 3],
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            mu: 0.0,
            sigma: 0.03,
            sigma_extreme: 0.3,
            desp_ratio: 0.04,
            weights: [0.4, 0.4, 0.2],
        }
    }
}

impl MutationParams {
    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvoError::InvalidMutationParameter`] | `mu` or a spread parameter is out of range |
    /// | [`EvoError::InvalidVariantWeights`] | a weight is invalid, or all are zero |
    pub fn validate(&self) -> Result<(), EvoError> {
        if !self.mu.is_finite() {
            return Err(EvoError::InvalidMutationParameter {
                name: "mu",
                value: self.mu,
            });
        }
        for (name, value) in [
            ("sigma", self.sigma),
            ("sigma_extreme", self.sigma_extreme),
            ("desp_ratio", self.desp_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EvoError::InvalidMutationParameter { name, value });
            }
        }
        let sum: f64 = self.weights.iter().sum();
        if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) || sum <= 0.0 {
            return Err(EvoError::InvalidVariantWeights {
                weights: self.weights,
            });
        }
        Ok(())
    }

    /// Maximum lateral displacement in samples for a reference series of
    /// `reference_len` values: `max(2, round(desp_ratio * reference_len))`.
    #[must_use]
    pub fn displacement(&self, reference_len: usize) -> usize {
        ((self.desp_ratio * reference_len as f64).round() as usize).max(2)
    }
}

/// Configuration for the evolutionary centroid search.
///
/// Construct via [`GaConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter           | Default                    |
/// |---------------------|----------------------------|
/// | `cxpb`              | 0.2                        |
/// | `mutpb`             | 0.1                        |
/// | `mutation`          | [`MutationParams::default`] |
/// | `tournsize`         | 10                         |
/// | `batch_evaluate`    | false                      |
/// | `batch_size`        | 0.1                        |
/// | `parallel`          | false                      |
/// | `trace_convergence` | false                      |
/// | `seed`              | 42                         |
/// | `hof_size`          | 3                          |
/// | `fitness_mode`      | [`FitnessMode::Exact`]     |
#[derive(Debug, Clone)]
pub struct GaConfig {
    pub(crate) pop_size: usize,
    pub(crate) ngen: usize,
    pub(crate) cxpb: f64,
    pub(crate) mutpb: f64,
    pub(crate) mutation: MutationParams,
    pub(crate) tournsize: usize,
    pub(crate) batch_evaluate: bool,
    pub(crate) batch_size: f64,
    pub(crate) parallel: bool,
    pub(crate) trace_convergence: bool,
    pub(crate) seed: u64,
    pub(crate) hof_size: usize,
    pub(crate) fitness_mode: FitnessMode,
}

impl Default for GaConfig {
    /// 100 individuals evolved for 200 generations.
    fn default() -> Self {
        Self {
            pop_size: 100,
            ngen: 200,
            cxpb: 0.2,
            mutpb: 0.1,
            mutation: MutationParams::default(),
            tournsize: 10,
            batch_evaluate: false,
            batch_size: 0.1,
            parallel: false,
            trace_convergence: false,
            seed: 42,
            hof_size: 3,
            fitness_mode: FitnessMode::Exact,
        }
    }
}

impl GaConfig {
    /// Create a configuration evolving `pop_size` individuals for `ngen` generations.
    ///
    /// `ngen == 0` is allowed and only evaluates the initial population.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvoError::InvalidPopulationSize`] | `pop_size` is zero |
    pub fn new(pop_size: usize, ngen: usize) -> Result<Self, EvoError> {
        if pop_size == 0 {
            return Err(EvoError::InvalidPopulationSize { pop_size });
        }
        Ok(Self {
            pop_size,
            ngen,
            ..Self::default()
        })
    }

    /// Set the probability of crossing each adjacent pair.
    #[must_use]
    pub fn with_cxpb(mut self, cxpb: f64) -> Self {
        self.cxpb = cxpb;
        self
    }

    /// Set the probability of mutating each individual.
    #[must_use]
    pub fn with_mutpb(mut self, mutpb: f64) -> Self {
        self.mutpb = mutpb;
        self
    }

    /// Set the mutation parameters.
    #[must_use]
    pub fn with_mutation(mut self, mutation: MutationParams) -> Self {
        self.mutation = mutation;
        self
    }

    /// Set the number of aspirants per tournament.
    #[must_use]
    pub fn with_tournsize(mut self, tournsize: usize) -> Self {
        self.tournsize = tournsize;
        self
    }

    /// Score every generation against a fresh random subsample of the series.
    #[must_use]
    pub fn with_batch_evaluate(mut self, batch_evaluate: bool) -> Self {
        self.batch_evaluate = batch_evaluate;
        self
    }

    /// Set the subsample size as a fraction of the series count, in `(0, 1]`.
    ///
    /// Also sets the convergence trace interval, `max(1, round(0.05 / batch_size))`.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: f64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Evaluate candidates of one generation on the rayon thread pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Record a wall-clock convergence trace against the raw series.
    #[must_use]
    pub fn with_trace_convergence(mut self, trace_convergence: bool) -> Self {
        self.trace_convergence = trace_convergence;
        self
    }

    /// Set the seed of the run's random stream.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the HallOfFame capacity.
    #[must_use]
    pub fn with_hof_size(mut self, hof_size: usize) -> Self {
        self.hof_size = hof_size;
        self
    }

    /// Set how candidates are scored.
    #[must_use]
    pub fn with_fitness_mode(mut self, fitness_mode: FitnessMode) -> Self {
        self.fitness_mode = fitness_mode;
        self
    }

    /// Return the population size.
    #[must_use]
    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    /// Return the number of generations.
    #[must_use]
    pub fn ngen(&self) -> usize {
        self.ngen
    }

    /// Return the crossover probability.
    #[must_use]
    pub fn cxpb(&self) -> f64 {
        self.cxpb
    }

    /// Return the mutation probability.
    #[must_use]
    pub fn mutpb(&self) -> f64 {
        self.mutpb
    }

    /// Return the mutation parameters.
    #[must_use]
    pub fn mutation(&self) -> &MutationParams {
        &self.mutation
    }

    /// Return the tournament size.
    #[must_use]
    pub fn tournsize(&self) -> usize {
        self.tournsize
    }

    /// Return whether batch evaluation is enabled.
    #[must_use]
    pub fn batch_evaluate(&self) -> bool {
        self.batch_evaluate
    }

    /// Return the batch size ratio.
    #[must_use]
    pub fn batch_size(&self) -> f64 {
        self.batch_size
    }

    /// Return whether evaluation runs in parallel.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Return whether the convergence trace is recorded.
    #[must_use]
    pub fn trace_convergence(&self) -> bool {
        self.trace_convergence
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the HallOfFame capacity.
    #[must_use]
    pub fn hof_size(&self) -> usize {
        self.hof_size
    }

    /// Return the fitness mode.
    #[must_use]
    pub fn fitness_mode(&self) -> FitnessMode {
        self.fitness_mode
    }

    /// Number of series drawn per batch from a set of `n_series`:
    /// `max(1, round(batch_size * n_series))`, capped at `n_series`.
    #[must_use]
    pub fn batch_len(&self, n_series: usize) -> usize {
        ((self.batch_size * n_series as f64).round() as usize)
            .max(1)
            .min(n_series.max(1))
    }

    /// Generations between two convergence trace points.
    #[must_use]
    pub fn trace_step(&self) -> usize {
        ((0.05 / self.batch_size).round() as usize).max(1)
    }

    /// Reject every invalid setting before a run starts.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvoError::InvalidPopulationSize`] | `pop_size` is zero |
    /// | [`EvoError::InvalidProbability`] | `cxpb` or `mutpb` outside `[0, 1]` |
    /// | [`EvoError::InvalidBatchSize`] | `batch_size` outside `(0, 1]` |
    /// | [`EvoError::InvalidTournamentSize`] | `tournsize` is zero |
    /// | [`EvoError::InvalidMutationParameter`] | see [`MutationParams::validate`] |
    /// | [`EvoError::InvalidVariantWeights`] | see [`MutationParams::validate`] |
    pub fn validate(&self) -> Result<(), EvoError> {
        if self.pop_size == 0 {
            return Err(EvoError::InvalidPopulationSize {
                pop_size: self.pop_size,
            });
        }
        for (name, value) in [("cxpb", self.cxpb), ("mutpb", self.mutpb)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EvoError::InvalidProbability { name, value });
            }
        }
        if !(self.batch_size > 0.0 && self.batch_size <= 1.0) {
            return Err(EvoError::InvalidBatchSize {
                batch_size: self.batch_size,
            });
        }
        if self.tournsize == 0 {
            return Err(EvoError::InvalidTournamentSize {
                tournsize: self.tournsize,
            });
        }
        if let FitnessMode::Fast { window_ratio } = self.fitness_mode
            && (!window_ratio.is_finite() || window_ratio < 0.0)
        {
            return Err(EvoError::InvalidMutationParameter {
                name: "window_ratio",
                value: window_ratio,
            });
        }
        self.mutation.validate()
    }

    /// Compute the centroid of `series` using this configuration.
    ///
    /// # Errors
    ///
    /// See [`compute_centroid`].
    #[instrument(
        skip_all,
        fields(n_series = series.len(), pop_size = self.pop_size, ngen = self.ngen)
    )]
    pub fn fit<S: AsRef<[f64]>>(&self, series: &[S]) -> Result<CentroidResult, EvoError> {
        compute_centroid(series, self)
    }
}
