//! Tournament selection.

use rand::{Rng, RngCore};

use crate::individual::Individual;
use crate::operators::Select;

/// Fills each slot with the fittest of `tournsize` aspirants drawn uniformly
/// with replacement. Ties go to the earliest aspirant drawn.
#[derive(Debug, Clone, Copy)]
pub struct Tournament {
    tournsize: usize,
}

impl Tournament {
    /// Create a tournament with `tournsize` aspirants (at least 1).
    #[must_use]
    pub fn new(tournsize: usize) -> Self {
        Self {
            tournsize: tournsize.max(1),
        }
    }

    /// Return the number of aspirants per tournament.
    #[must_use]
    pub fn tournsize(&self) -> usize {
        self.tournsize
    }
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Select for Tournament {
    fn select(
        &self,
        population: &[Individual],
        k: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Individual> {
        if population.is_empty() {
            return Vec::new();
        }
        (0..k)
            .map(|_| {
                let mut best = &population[rng.gen_range(0..population.len())];
                for _ in 1..self.tournsize {
                    let aspirant = &population[rng.gen_range(0..population.len())];
                    if aspirant.cmp_fitness(best).is_lt() {
                        best = aspirant;
                    }
                }
                best.clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Fitness;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scored(values: &[f64]) -> Vec<Individual> {
        values
            .iter()
            .map(|&f| {
                let mut ind = Individual::new(vec![f]);
                ind.set_fitness(Fitness::new(f));
                ind
            })
            .collect()
    }

    #[test]
    fn selects_requested_count() {
        let pop = scored(&[3.0, 1.0, 2.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(Tournament::new(2).select(&pop, 7, &mut rng).len(), 7);
    }

    #[test]
    fn large_tournament_prefers_best() {
        let pop = scored(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let picked = Tournament::new(200).select(&pop, 20, &mut rng);
        assert!(picked.iter().all(|ind| ind.fitness() == Some(Fitness::new(1.0))));
    }

    #[test]
    fn size_one_is_uniform_sampling() {
        let pop = scored(&[5.0, 4.0, 3.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let picked = Tournament::new(1).select(&pop, 200, &mut rng);
        assert!(picked.iter().any(|ind| ind.fitness() == Some(Fitness::new(5.0))));
    }

    #[test]
    fn selected_copies_are_independent() {
        let pop = scored(&[1.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut picked = Tournament::default().select(&pop, 2, &mut rng);
        picked[0].set_values(vec![9.0]);
        assert_eq!(picked[1].values(), &[1.0]);
        assert_eq!(pop[0].values(), &[1.0]);
    }
}
