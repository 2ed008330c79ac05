//! Per-generation statistics and the convergence trace.

use std::time::{Duration, Instant};

use serde::Serialize;

use segwarp_dtw::{NormalizationStats, TimeSeries};

use crate::error::EvoError;
use crate::fitness::fitness;
use crate::individual::Individual;

/// Fitness statistics of one generation's population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRecord {
    /// Generation index, 0 for the initial population.
    pub generation: usize,
    /// Number of individuals (re-)evaluated in this generation.
    pub nevals: usize,
    /// Mean fitness.
    pub avg: f64,
    /// Population standard deviation of the fitness.
    pub std: f64,
    /// Lowest fitness.
    pub min: f64,
    /// Highest fitness.
    pub max: f64,
}

impl GenerationRecord {
    /// Summarise the evaluated members of `population`.
    #[must_use]
    pub fn from_population(generation: usize, nevals: usize, population: &[Individual]) -> Self {
        let values: Vec<f64> =
            population.iter().filter_map(Individual::fitness).map(|f| f.value()).collect();
        let n = values.len().max(1) as f64;
        let avg = values.iter().sum::<f64>() / n;
        let std = (values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n).sqrt();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            generation,
            nevals,
            avg,
            std,
            min,
            max,
        }
    }
}

/// Append-only sequence of generation records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Logbook {
    records: Vec<GenerationRecord>,
}

impl Logbook {
    /// Create an empty logbook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn record(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    /// All records in generation order.
    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    /// Return the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of evaluations over the run.
    #[must_use]
    pub fn total_evaluations(&self) -> usize {
        self.records.iter().map(|r| r.nevals).sum()
    }
}

/// One point of the convergence trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergencePoint {
    /// Generation at which the point was taken.
    pub generation: usize,
    /// Wall-clock seconds since generation 0, excluding tracing overhead.
    pub elapsed_secs: f64,
    /// Exact-DTW fitness of the best archived individual against the raw
    /// series, divided by the series count and the first series' length.
    pub fitness: f64,
}

/// Scores the best archived individual against the raw, un-normalised set at
/// a fixed generation interval.
#[derive(Debug)]
pub struct ConvergenceTracer<'a> {
    raw: &'a [TimeSeries],
    stats: NormalizationStats,
    step: usize,
    started: Option<Instant>,
    overhead: Duration,
    points: Vec<ConvergencePoint>,
}

impl<'a> ConvergenceTracer<'a> {
    /// Trace against `raw`, mapping candidates back with `stats`, every `step`
    /// generations (at least 1).
    #[must_use]
    pub fn new(raw: &'a [TimeSeries], stats: NormalizationStats, step: usize) -> Self {
        Self {
            raw,
            stats,
            step: step.max(1),
            started: None,
            overhead: Duration::ZERO,
            points: Vec::new(),
        }
    }

    /// Record a point for `generation` if it falls on the interval. Generation
    /// 0 starts the clock and is recorded at time 0.
    ///
    /// # Errors
    ///
    /// Propagates [`EvoError::Dtw`] from scoring `best`.
    pub fn observe(&mut self, generation: usize, best: &Individual) -> Result<(), EvoError> {
        match self.started {
            None => {
                let fitness = self.score(best)?;
                self.points.push(ConvergencePoint {
                    generation,
                    elapsed_secs: 0.0,
                    fitness,
                });
                self.started = Some(Instant::now());
            }
            Some(started) if generation % self.step == 0 => {
                let measuring = Instant::now();
                let fitness = self.score(best)?;
                self.overhead += measuring.elapsed();
                let elapsed = started.elapsed().saturating_sub(self.overhead);
                self.points.push(ConvergencePoint {
                    generation,
                    elapsed_secs: elapsed.as_secs_f64(),
                    fitness,
                });
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn score(&self, best: &Individual) -> Result<f64, EvoError> {
        let centroid = self.stats.denormalize(best.values());
        let total = fitness(&centroid, self.raw)?.value();
        let n_series = self.raw.len().max(1) as f64;
        let reference_len = self.raw.first().map_or(1, TimeSeries::len) as f64;
        Ok(total / n_series / reference_len)
    }

    /// Consume the tracer and return its points.
    #[must_use]
    pub fn into_points(self) -> Vec<ConvergencePoint> {
        self.points
    }
}
