//! Initial population generators.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use segwarp_dtw::TimeSeries;

use crate::error::EvoError;
use crate::individual::Individual;
use crate::operators::Generate;

/// Copies one input series chosen uniformly at random (with replacement).
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleGenerator;

impl Generate for SampleGenerator {
    fn generate(
        &self,
        series: &[TimeSeries],
        rng: &mut dyn RngCore,
    ) -> Result<Individual, EvoError> {
        series
            .choose(rng)
            .map(|s| Individual::new(s.as_slice().to_vec()))
            .ok_or(EvoError::EmptySeriesSet)
    }
}

/// Draws `len` values uniformly from the pooled `[min, max]` range of the set.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    len: usize,
}

impl RandomGenerator {
    /// Generate individuals of `len` values (at least 1).
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len: len.max(1) }
    }
}

impl Generate for RandomGenerator {
    fn generate(
        &self,
        series: &[TimeSeries],
        rng: &mut dyn RngCore,
    ) -> Result<Individual, EvoError> {
        if series.is_empty() {
            return Err(EvoError::EmptySeriesSet);
        }
        let lo = series.iter().map(TimeSeries::min).fold(f64::INFINITY, f64::min);
        let hi = series.iter().map(TimeSeries::max).fold(f64::NEG_INFINITY, f64::max);
        let values = (0..self.len).map(|_| rng.r#gen::<f64>() * (hi - lo) + lo).collect();
        Ok(Individual::new(values))
    }
}
