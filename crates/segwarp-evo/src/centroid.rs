//! Centroid computation: normalise, evolve, denormalise, re-score.

use tracing::{info, instrument};

use segwarp_dtw::{TimeSeries, normalize};

use crate::config::GaConfig;
use crate::engine::Engine;
use crate::error::EvoError;
use crate::fitness::fitness;
use crate::logbook::{ConvergencePoint, ConvergenceTracer, Logbook};
use crate::operators::Operators;

/// Result of a centroid computation.
#[derive(Debug, Clone)]
pub struct CentroidResult {
    /// The centroid, in the units of the input series.
    pub centroid: Vec<f64>,
    /// Exact-DTW fitness of the centroid against every input series.
    pub fitness: f64,
    /// Per-generation statistics of the search, in normalised units.
    pub logbook: Logbook,
    /// Convergence trace, when enabled in the configuration.
    pub trace: Option<Vec<ConvergencePoint>>,
}

/// Compute a DTW centroid of `series` by evolutionary search.
///
/// The series are z-normalised with pooled statistics, evolved with the
/// default [`Operators`] for `config`, and the best archived individual is
/// mapped back and scored against the original series.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`EvoError::EmptySeriesSet`] | `series` is empty |
/// | [`EvoError::Dtw`] | a series is empty or holds a non-finite value |
/// | [`EvoError::Normalize`] | every value of every series is identical |
/// | configuration variants | see [`GaConfig::validate`] |
/// | run variants | see [`Engine::run`] |
#[instrument(skip_all, fields(n_series = series.len()))]
pub fn compute_centroid<S: AsRef<[f64]>>(
    series: &[S],
    config: &GaConfig,
) -> Result<CentroidResult, EvoError> {
    config.validate()?;
    if series.is_empty() {
        return Err(EvoError::EmptySeriesSet);
    }

    let raw = TimeSeries::collect_from(series)?;
    let (normalized, stats) = normalize(&raw)?;
    let normalized = TimeSeries::collect_from(&normalized)?;

    let desp = config.mutation.displacement(normalized[0].len());
    let operators = Operators::from_config(config, desp)?;
    let mut engine = Engine::new(config, operators)?;
    let tracer = config
        .trace_convergence
        .then(|| ConvergenceTracer::new(&raw, stats, config.trace_step()));

    let evolution = engine.run(&normalized, tracer)?;

    let best = evolution
        .hall_of_fame
        .best()
        .or_else(|| evolution.population.iter().min_by(|a, b| a.cmp_fitness(b)))
        .ok_or(EvoError::EmptySeriesSet)?;
    let centroid = stats.denormalize(best.values());
    let fitness = fitness(&centroid, &raw)?.value();

    info!(len = centroid.len(), fitness, desp, "centroid computed");

    Ok(CentroidResult {
        centroid,
        fitness,
        logbook: evolution.logbook,
        trace: evolution.trace,
    })
}
