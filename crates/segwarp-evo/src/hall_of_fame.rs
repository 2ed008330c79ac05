//! Bounded archive of the best individuals ever evaluated.

use crate::individual::Individual;

/// The best `capacity` distinct individuals seen so far, ordered by ascending
/// fitness. Members are snapshots, independent of the working population.
#[derive(Debug, Clone)]
pub struct HallOfFame {
    capacity: usize,
    members: Vec<Individual>,
}

impl HallOfFame {
    /// Create an empty archive holding at most `capacity` individuals.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity),
        }
    }

    /// Offer every evaluated individual of `population` to the archive.
    ///
    /// A candidate enters when the archive is not full or it beats the worst
    /// member, and no value-identical member is already archived. Among equal
    /// fitness values, earlier entries rank first.
    pub fn update(&mut self, population: &[Individual]) {
        for candidate in population {
            let Some(fitness) = candidate.fitness() else {
                continue;
            };
            let full = self.members.len() >= self.capacity;
            if full {
                let beats_worst = self
                    .members
                    .last()
                    .and_then(Individual::fitness)
                    .is_some_and(|worst| fitness.value() < worst.value());
                if !beats_worst {
                    continue;
                }
            }
            if self.members.iter().any(|m| m == candidate) {
                continue;
            }
            if full {
                self.members.pop();
            }
            let pos = self
                .members
                .partition_point(|m| m.fitness().is_some_and(|f| f.value() <= fitness.value()));
            self.members.insert(pos, candidate.clone());
        }
    }

    /// Best archived individual.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.members.first()
    }

    /// Archived individuals, best first.
    #[must_use]
    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    /// Return the number of archived individuals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Return true if nothing has been archived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Return the maximum number of archived individuals.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
