//! The three segment mutations: lateral displacement, smooth vertical shift
//! and extreme vertical shift.

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use tracing::trace;

use segwarp_dtw::interpolate;

use crate::config::MutationParams;
use crate::error::EvoError;
use crate::individual::Individual;
use crate::operators::Mutate;

/// Which mutation was drawn for an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationVariant {
    /// One segment widened and another narrowed by the same amount.
    Lateral,
    /// A contiguous range raised or lowered with slight per-element jitter.
    Smooth,
    /// A single value raised or lowered.
    Extreme,
}

/// Result of a mutation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The variant was applied and the fitness invalidated.
    Applied(MutationVariant),
    /// The individual is too short for the drawn lateral displacement and was
    /// left untouched, fitness included.
    Impossible {
        /// The signed displacement that could not be applied.
        displacement: isize,
    },
}

/// Segment mutation with the three variants chosen by configurable weights.
#[derive(Debug, Clone)]
pub struct SegmentMutation {
    desp: usize,
    thresholds: [f64; 2],
    smooth: Normal<f64>,
    extreme: Normal<f64>,
}

impl SegmentMutation {
    /// Build the operator from mutation parameters and a maximum lateral
    /// displacement `desp` in samples (at least 1).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EvoError::InvalidMutationParameter`] | a parameter or normal distribution is invalid |
    /// | [`EvoError::InvalidVariantWeights`] | the variant weights are invalid |
    pub fn new(params: &MutationParams, desp: usize) -> Result<Self, EvoError> {
        params.validate()?;
        let smooth = Normal::new(params.mu, params.sigma).map_err(|_| {
            EvoError::InvalidMutationParameter {
                name: "sigma",
                value: params.sigma,
            }
        })?;
        let extreme = Normal::new(params.mu, params.sigma_extreme).map_err(|_| {
            EvoError::InvalidMutationParameter {
                name: "sigma_extreme",
                value: params.sigma_extreme,
            }
        })?;
        let total: f64 = params.weights.iter().sum();
        let lateral = params.weights[0] / total;
        let thresholds = [lateral, lateral + params.weights[1] / total];
        Ok(Self {
            desp: desp.max(1),
            thresholds,
            smooth,
            extreme,
        })
    }

    /// Return the maximum lateral displacement.
    #[must_use]
    pub fn desp(&self) -> usize {
        self.desp
    }

    /// Map a uniform draw in `[0, 1)` to a variant. The unit interval is
    /// split into three disjoint ranges sized by the normalised weights.
    #[must_use]
    pub fn variant_for(&self, p: f64) -> MutationVariant {
        if p < self.thresholds[0] {
            MutationVariant::Lateral
        } else if p < self.thresholds[1] {
            MutationVariant::Smooth
        } else {
            MutationVariant::Extreme
        }
    }

    /// Resize the segment left of a random split by `d` samples and one right
    /// of it by `-d`, keeping the total length. `None` when `n < 3|d|`.
    fn lateral(
        values: &[f64],
        d: isize,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Vec<f64>>, EvoError> {
        let n = values.len();
        let shift = d.unsigned_abs();
        debug_assert!(shift > 0, "lateral displacement of zero");
        if n < 3 * shift {
            return Ok(None);
        }

        // The compressed segment needs `shift + 1` samples, the stretched one 1.
        let (min_a, min_b) = if d > 0 {
            (1, shift + 1)
        } else {
            (shift + 1, 1)
        };
        let split = rng.gen_range(min_a..=n - min_b);
        let a_start = rng.gen_range(0..=split - min_a);
        let a_end = rng.gen_range(a_start + min_a..=split);
        let b_start = rng.gen_range(split..=n - min_b);
        let b_end = rng.gen_range(b_start + min_b..=n);

        let (a_len, b_len) = if d > 0 {
            (a_end - a_start + shift, b_end - b_start - shift)
        } else {
            (a_end - a_start - shift, b_end - b_start + shift)
        };

        let mut out = Vec::with_capacity(n);
        out.extend_from_slice(&values[..a_start]);
        out.extend(interpolate(&values[a_start..a_end], a_len)?);
        out.extend_from_slice(&values[a_end..b_start]);
        out.extend(interpolate(&values[b_start..b_end], b_len)?);
        out.extend_from_slice(&values[b_end..]);
        trace!(d, a = ?(a_start..a_end), b = ?(b_start..b_end), "lateral displacement");
        Ok(Some(out))
    }

    /// Add a jittered normal offset to a random contiguous range.
    ///
    /// Range bounds follow two-point crossover: both cut points are drawn from
    /// `1..=n`, so the first value is never shifted unless `n == 1`.
    fn smooth_shift(&self, values: &mut [f64], rng: &mut dyn RngCore) {
        let n = values.len();
        let range = if n == 1 {
            0..1
        } else {
            let mut lo = rng.gen_range(1..=n);
            let mut hi = rng.gen_range(1..n);
            if hi >= lo {
                hi += 1;
            } else {
                std::mem::swap(&mut lo, &mut hi);
            }
            lo..hi
        };
        let d = self.smooth.sample(rng);
        for v in &mut values[range] {
            *v += d * (rng.r#gen::<f64>() * 0.1 + 0.9);
        }
    }

    /// Add a wide normal offset to one random value.
    fn extreme_shift(&self, values: &mut [f64], rng: &mut dyn RngCore) {
        let c = rng.gen_range(0..values.len());
        values[c] += self.extreme.sample(rng);
    }
}

impl Mutate for SegmentMutation {
    fn mutate(
        &self,
        individual: &mut Individual,
        rng: &mut dyn RngCore,
    ) -> Result<MutationOutcome, EvoError> {
        let magnitude = rng.gen_range(1..=self.desp) as isize;
        let d = if rng.gen_bool(0.5) {
            magnitude
        } else {
            -magnitude
        };
        if individual.is_empty() {
            return Ok(MutationOutcome::Impossible { displacement: d });
        }

        let variant = self.variant_for(rng.r#gen::<f64>());
        match variant {
            MutationVariant::Lateral => {
                match Self::lateral(individual.values(), d, rng)? {
                    Some(values) => individual.set_values(values),
                    None => return Ok(MutationOutcome::Impossible { displacement: d }),
                }
            }
            MutationVariant::Smooth => {
                self.smooth_shift(individual.values_mut(), rng);
                individual.invalidate();
            }
            MutationVariant::Extreme => {
                self.extreme_shift(individual.values_mut(), rng);
                individual.invalidate();
            }
        }
        Ok(MutationOutcome::Applied(variant))
    }
}
