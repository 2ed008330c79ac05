//! Evolutionary search for a DTW centroid of variable-length time series.
//!
//! A generational genetic algorithm over candidate series. Crossover swaps
//! segments found from the parents' DTW alignment, mutation shifts segments
//! laterally or vertically, and fitness is the sum of squared DTW costs to
//! the evaluation set. Supports batch evaluation on random subsamples,
//! evaluation dedup, rayon-parallel scoring and a convergence trace.

mod centroid;
mod config;
mod crossover;
mod engine;
mod error;
mod fitness;
mod generate;
mod hall_of_fame;
mod individual;
mod logbook;
mod mutation;
mod operators;
mod selection;

pub use centroid::{CentroidResult, compute_centroid};
pub use config::{FitnessMode, GaConfig, MutationParams};
pub use crossover::{PathSegment, SegmentCrossover, alignment_segments};
pub use engine::{Engine, Evolution};
pub use error::EvoError;
pub use fitness::{DtwFitness, FastDtwFitness, fitness};
pub use generate::{RandomGenerator, SampleGenerator};
pub use hall_of_fame::HallOfFame;
pub use individual::{Fitness, Individual};
pub use logbook::{ConvergencePoint, ConvergenceTracer, GenerationRecord, Logbook};
pub use mutation::{MutationOutcome, MutationVariant, SegmentMutation};
pub use operators::{Evaluate, Generate, Mate, Mutate, Operators, Select};
pub use selection::Tournament;
