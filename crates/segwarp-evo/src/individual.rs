//! Candidate centroids and their cached fitness.

use std::cmp::Ordering;
use std::fmt;

/// Sum of squared alignment distances from a candidate to an evaluation set.
/// Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Fitness(f64);

impl Fitness {
    /// Wrap a raw fitness value.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw fitness value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// A candidate centroid: a value sequence plus an optional cached fitness.
///
/// The fitness is `None` whenever the values changed since the last
/// evaluation. Cloning copies the values, so clones never alias.
#[derive(Debug, Clone)]
pub struct Individual {
    values: Vec<f64>,
    fitness: Option<Fitness>,
}

impl Individual {
    /// Create an unevaluated individual.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            fitness: None,
        }
    }

    /// Return the values as a slice.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Replace the values, invalidating the fitness.
    pub fn set_values(&mut self, values: Vec<f64>) {
        self.values = values;
        self.fitness = None;
    }

    /// Mutable access to the values. The caller must invalidate the fitness.
    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Return the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return true if the individual holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the cached fitness, if valid.
    #[must_use]
    pub fn fitness(&self) -> Option<Fitness> {
        self.fitness
    }

    /// Return true if the cached fitness is valid.
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Store an evaluated fitness.
    pub fn set_fitness(&mut self, fitness: Fitness) {
        self.fitness = Some(fitness);
    }

    /// Mark the cached fitness as stale.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Consume the individual and return its values.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Bit pattern of the values, equal for value-identical individuals.
    ///
    /// `-0.0` maps to `0.0` so that the key agrees with `==` on finite values.
    #[must_use]
    pub fn value_key(&self) -> Vec<u64> {
        self.values
            .iter()
            .map(|&v| {
                if v == 0.0 {
                    0.0f64.to_bits()
                } else {
                    v.to_bits()
                }
            })
            .collect()
    }

    /// Order two evaluated individuals by fitness; unevaluated ones sort last.
    #[must_use]
    pub fn cmp_fitness(&self, other: &Self) -> Ordering {
        match (self.fitness, other.fitness) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialEq for Individual {
    /// Value equality; the cached fitness is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl AsRef<[f64]> for Individual {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for Individual {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
