//! The generational loop: selection, variation, deduplicated evaluation,
//! archive update and statistics.

use std::collections::HashMap;

use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use segwarp_dtw::{TimeSeries, TimeSeriesView};

use crate::config::GaConfig;
use crate::error::EvoError;
use crate::hall_of_fame::HallOfFame;
use crate::individual::{Fitness, Individual};
use crate::logbook::{ConvergencePoint, ConvergenceTracer, GenerationRecord, Logbook};
use crate::mutation::MutationOutcome;
use crate::operators::Operators;

/// Final state of an evolutionary run.
#[derive(Debug, Clone)]
pub struct Evolution {
    /// Population after the last generation.
    pub population: Vec<Individual>,
    /// Per-generation statistics, generation 0 first.
    pub logbook: Logbook,
    /// Best individuals seen over the whole run.
    pub hall_of_fame: HallOfFame,
    /// Convergence trace, when a tracer was supplied.
    pub trace: Option<Vec<ConvergencePoint>>,
}

/// Evolutionary engine owning the operator set and the run's random stream.
#[derive(Debug)]
pub struct Engine {
    config: GaConfig,
    operators: Operators,
    rng: ChaCha8Rng,
}

impl Engine {
    /// Validate `config` and build an engine seeded from it.
    ///
    /// # Errors
    ///
    /// Any error from [`GaConfig::validate`].
    pub fn new(config: &GaConfig, operators: Operators) -> Result<Self, EvoError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            operators,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    /// Evolve a population over `series` (already normalised).
    ///
    /// When `tracer` is given, it observes the best archived individual at
    /// generation 0 and at its configured interval.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvoError::EmptySeriesSet`] | `series` is empty |
    /// | [`EvoError::NonFiniteFitness`] | an evaluation yields NaN or infinity |
    /// | [`EvoError::Dtw`] | a candidate holds a non-finite value |
    /// | [`EvoError::Resample`] | a variation operator fails to resample |
    #[instrument(
        skip_all,
        fields(
            n_series = series.len(),
            pop_size = self.config.pop_size,
            ngen = self.config.ngen
        )
    )]
    pub fn run(
        &mut self,
        series: &[TimeSeries],
        mut tracer: Option<ConvergenceTracer<'_>>,
    ) -> Result<Evolution, EvoError> {
        if series.is_empty() {
            return Err(EvoError::EmptySeriesSet);
        }

        let mut population = (0..self.config.pop_size)
            .map(|_| self.operators.generate.generate(series, &mut self.rng))
            .collect::<Result<Vec<_>, _>>()?;
        let mut hall_of_fame = HallOfFame::new(self.config.hof_size);
        let mut logbook = Logbook::new();

        let nevals = self.evaluate(&mut population, series, 0)?;
        hall_of_fame.update(&population);
        logbook.record(GenerationRecord::from_population(0, nevals, &population));
        Self::observe(&mut tracer, 0, &hall_of_fame, &population)?;

        for generation in 1..=self.config.ngen {
            let selected =
                self.operators.select.select(&population, population.len(), &mut self.rng);
            let mut offspring = self.vary(selected)?;

            let nevals = self.evaluate(&mut offspring, series, generation)?;
            hall_of_fame.update(&offspring);
            population = offspring;

            let record = GenerationRecord::from_population(generation, nevals, &population);
            debug!(
                generation,
                nevals,
                avg = record.avg,
                min = record.min,
                max = record.max,
                "generation complete"
            );
            logbook.record(record);
            Self::observe(&mut tracer, generation, &hall_of_fame, &population)?;
        }

        info!(
            generations = self.config.ngen,
            evaluations = logbook.total_evaluations(),
            best = hall_of_fame.best().and_then(Individual::fitness).map(Fitness::value),
            "evolution complete"
        );

        Ok(Evolution {
            population,
            logbook,
            hall_of_fame,
            trace: tracer.map(ConvergenceTracer::into_points),
        })
    }

    /// Crossover on adjacent pairs with probability `cxpb`, then mutation of
    /// each individual with probability `mutpb`.
    fn vary(&mut self, mut offspring: Vec<Individual>) -> Result<Vec<Individual>, EvoError> {
        for i in (1..offspring.len()).step_by(2) {
            if self.rng.r#gen::<f64>() < self.config.cxpb {
                let (head, tail) = offspring.split_at_mut(i);
                self.operators.mate.mate(&mut head[i - 1], &mut tail[0], &mut self.rng)?;
            }
        }

        for individual in &mut offspring {
            if self.rng.r#gen::<f64>() < self.config.mutpb {
                let outcome = self.operators.mutate.mutate(individual, &mut self.rng)?;
                if let MutationOutcome::Impossible { displacement } = outcome {
                    warn!(
                        displacement,
                        len = individual.len(),
                        "lateral displacement impossible, individual left unchanged"
                    );
                }
            }
        }
        Ok(offspring)
    }

    /// Evaluate the individuals that need it and return how many there were.
    ///
    /// Outside batch mode only individuals without a valid fitness are scored
    /// against the full set. In batch mode every individual is scored against
    /// a fresh random subsample. Value-identical individuals are scored once.
    fn evaluate(
        &mut self,
        population: &mut [Individual],
        series: &[TimeSeries],
        generation: usize,
    ) -> Result<usize, EvoError> {
        let eval_set: Vec<TimeSeriesView<'_>> = if self.config.batch_evaluate {
            let batch_len = self.config.batch_len(series.len());
            sample(&mut self.rng, series.len(), batch_len)
                .into_iter()
                .map(|i| series[i].as_view())
                .collect()
        } else {
            series.iter().map(TimeSeries::as_view).collect()
        };

        let pending: Vec<usize> = (0..population.len())
            .filter(|&i| self.config.batch_evaluate || !population[i].is_evaluated())
            .collect();

        let mut slot_of_key: HashMap<Vec<u64>, usize> = HashMap::new();
        let mut unique: Vec<usize> = Vec::new();
        let slots: Vec<usize> = pending
            .iter()
            .map(|&i| {
                *slot_of_key.entry(population[i].value_key()).or_insert_with(|| {
                    unique.push(i);
                    unique.len() - 1
                })
            })
            .collect();

        let evaluator = &*self.operators.evaluate;
        let score = |i: &usize| -> Result<Fitness, EvoError> {
            let candidate = TimeSeriesView::new(population[*i].values())?;
            Ok(evaluator.evaluate(candidate, &eval_set))
        };
        let scores: Vec<Fitness> = if self.config.parallel {
            unique.par_iter().map(score).collect::<Result<_, _>>()?
        } else {
            unique.iter().map(score).collect::<Result<_, _>>()?
        };

        if scores.iter().any(|f| !f.value().is_finite()) {
            return Err(EvoError::NonFiniteFitness { generation });
        }

        for (&i, &slot) in pending.iter().zip(&slots) {
            population[i].set_fitness(scores[slot]);
        }
        debug!(
            generation,
            pending = pending.len(),
            unique = unique.len(),
            eval_set = eval_set.len(),
            "evaluation complete"
        );
        Ok(pending.len())
    }

    fn observe(
        tracer: &mut Option<ConvergenceTracer<'_>>,
        generation: usize,
        hall_of_fame: &HallOfFame,
        population: &[Individual],
    ) -> Result<(), EvoError> {
        let Some(tracer) = tracer else {
            return Ok(());
        };
        let best = hall_of_fame
            .best()
            .or_else(|| population.iter().min_by(|a, b| a.cmp_fitness(b)));
        match best {
            Some(best) => tracer.observe(generation, best),
            None => Ok(()),
        }
    }
}
