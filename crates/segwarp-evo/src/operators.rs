//! Strategy traits for the evolutionary loop and the default operator set.
//!
//! The engine never calls an operator directly; it receives an [`Operators`]
//! bundle at construction. Randomised operators draw from the engine's seeded
//! stream passed in as `&mut dyn RngCore`, so no operator holds global state.

use rand::RngCore;

use segwarp_dtw::{TimeSeries, TimeSeriesView};

use crate::config::{FitnessMode, GaConfig};
use crate::crossover::SegmentCrossover;
use crate::error::EvoError;
use crate::fitness::{DtwFitness, FastDtwFitness};
use crate::generate::SampleGenerator;
use crate::individual::{Fitness, Individual};
use crate::mutation::{MutationOutcome, SegmentMutation};
use crate::selection::Tournament;

/// Builds one initial individual from the (normalised) series set.
pub trait Generate: Send + Sync {
    /// Produce an unevaluated individual.
    ///
    /// # Errors
    ///
    /// Returns [`EvoError::EmptySeriesSet`] when `series` is empty.
    fn generate(&self, series: &[TimeSeries], rng: &mut dyn RngCore)
    -> Result<Individual, EvoError>;
}

/// Recombines two individuals in place.
pub trait Mate: Send + Sync {
    /// Replace both parents by their children, invalidating their fitness.
    ///
    /// # Errors
    ///
    /// Propagates alignment or resampling failures.
    fn mate(
        &self,
        first: &mut Individual,
        second: &mut Individual,
        rng: &mut dyn RngCore,
    ) -> Result<(), EvoError>;
}

/// Perturbs one individual in place.
pub trait Mutate: Send + Sync {
    /// Mutate `individual`, invalidating its fitness unless the outcome is
    /// [`MutationOutcome::Impossible`].
    ///
    /// # Errors
    ///
    /// Propagates resampling failures.
    fn mutate(
        &self,
        individual: &mut Individual,
        rng: &mut dyn RngCore,
    ) -> Result<MutationOutcome, EvoError>;
}

/// Chooses the parents of the next generation.
pub trait Select: Send + Sync {
    /// Return `k` copies of individuals chosen from `population`.
    fn select(&self, population: &[Individual], k: usize, rng: &mut dyn RngCore)
    -> Vec<Individual>;
}

/// Scores a candidate against an evaluation set. Must be deterministic.
pub trait Evaluate: Send + Sync {
    /// Fitness of `candidate` with respect to `series`; lower is better.
    fn evaluate(&self, candidate: TimeSeriesView<'_>, series: &[TimeSeriesView<'_>]) -> Fitness;
}

/// The operator set injected into the engine.
pub struct Operators {
    pub(crate) generate: Box<dyn Generate>,
    pub(crate) mate: Box<dyn Mate>,
    pub(crate) mutate: Box<dyn Mutate>,
    pub(crate) select: Box<dyn Select>,
    pub(crate) evaluate: Box<dyn Evaluate>,
}

impl Operators {
    /// Default operators for `config`: sampled initial individuals, segment
    /// crossover, segment mutation with at most `desp` samples of lateral
    /// displacement, tournament selection and DTW or FastDTW fitness.
    ///
    /// # Errors
    ///
    /// Propagates mutation parameter errors from [`SegmentMutation::new`].
    pub fn from_config(config: &GaConfig, desp: usize) -> Result<Self, EvoError> {
        let evaluate: Box<dyn Evaluate> = match config.fitness_mode {
            FitnessMode::Exact => Box::new(DtwFitness),
            FitnessMode::Fast { window_ratio } => Box::new(FastDtwFitness::new(window_ratio)),
        };
        Ok(Self {
            generate: Box::new(SampleGenerator),
            mate: Box::new(SegmentCrossover),
            mutate: Box::new(SegmentMutation::new(&config.mutation, desp)?),
            select: Box::new(Tournament::new(config.tournsize)),
            evaluate,
        })
    }

    /// Replace the initial-population generator.
    #[must_use]
    pub fn with_generate(mut self, generate: impl Generate + 'static) -> Self {
        self.generate = Box::new(generate);
        self
    }

    /// Replace the crossover operator.
    #[must_use]
    pub fn with_mate(mut self, mate: impl Mate + 'static) -> Self {
        self.mate = Box::new(mate);
        self
    }

    /// Replace the mutation operator.
    #[must_use]
    pub fn with_mutate(mut self, mutate: impl Mutate + 'static) -> Self {
        self.mutate = Box::new(mutate);
        self
    }

    /// Replace the selection operator.
    #[must_use]
    pub fn with_select(mut self, select: impl Select + 'static) -> Self {
        self.select = Box::new(select);
        self
    }

    /// Replace the fitness evaluator.
    #[must_use]
    pub fn with_evaluate(mut self, evaluate: impl Evaluate + 'static) -> Self {
        self.evaluate = Box::new(evaluate);
        self
    }
}

impl std::fmt::Debug for Operators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operators").finish_non_exhaustive()
    }
}
