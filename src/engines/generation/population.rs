use crate::engines::generation::genome::Genome;
use crate::engines::generation::individual::{Individual, IndividualId};
use crate::engines::simulation::clock::Timestamp;
use crate::error::{GeneticCarsError, Result};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Owns the active individuals of the current generation and the archive of
/// those that have already stalled.
pub struct PopulationManager {
    generation_size: usize,
    stagnation_timeout: u64,
    generation: usize,
    next_id: u64,
    active: Vec<Individual>,
    dead_archive: Vec<Individual>,
}

impl PopulationManager {
    pub fn new(generation_size: usize, stagnation_timeout: u64) -> Self {
        Self {
            generation_size,
            stagnation_timeout,
            generation: 0,
            next_id: 0,
            active: Vec::with_capacity(generation_size),
            dead_archive: Vec::with_capacity(generation_size),
        }
    }

    /// Turn exactly `generation_size` genomes into a fresh, all-alive
    /// generation.
    pub fn spawn_generation(&mut self, genomes: Vec<Genome>, now: Timestamp) -> Result<&[Individual]> {
        if genomes.len() != self.generation_size {
            return Err(GeneticCarsError::SizeMismatch {
                expected: self.generation_size,
                actual: genomes.len(),
            });
        }
        if !self.active.is_empty() {
            return Err(GeneticCarsError::GenerationInProgress {
                generation: self.generation,
                active: self.active.len(),
            });
        }
        if !self.dead_archive.is_empty() {
            warn!(
                "Refusing to spawn over {} undrained individuals from generation {}",
                self.dead_archive.len(),
                self.generation
            );
            return Err(GeneticCarsError::UndrainedArchive {
                generation: self.generation,
                dead: self.dead_archive.len(),
            });
        }

        self.generation += 1;
        for genome in genomes {
            let id = IndividualId(self.next_id);
            self.next_id += 1;
            self.active
                .push(Individual::spawn(id, self.generation, genome, now));
        }

        info!(
            "Spawned generation {} with {} individuals",
            self.generation,
            self.active.len()
        );
        Ok(&self.active)
    }

    /// Advance every active individual by one tick.
    ///
    /// `positions` must hold a forward position for every active individual;
    /// it is checked before any state changes. Individuals that stall are
    /// moved to the dead archive and returned, in insertion order.
    pub fn tick(&mut self, positions: &HashMap<IndividualId, f64>, now: Timestamp) -> Result<Vec<Individual>> {
        if let Some(missing) = self.active.iter().find(|ind| !positions.contains_key(&ind.id())) {
            return Err(GeneticCarsError::MissingPosition(missing.id()));
        }

        let mut died = Vec::new();
        let mut survivors = Vec::with_capacity(self.active.len());

        for mut individual in self.active.drain(..) {
            let position = positions[&individual.id()];
            if individual.observe(position, now, self.stagnation_timeout) {
                debug!(
                    "Individual {} stalled at {:.3} (generation {})",
                    individual.id(),
                    individual.fitness(),
                    individual.generation()
                );
                died.push(individual);
            } else {
                survivors.push(individual);
            }
        }

        self.active = survivors;
        self.dead_archive.extend(died.iter().cloned());
        Ok(died)
    }

    pub fn is_generation_over(&self) -> bool {
        self.active.is_empty()
    }

    /// The active individual furthest forward; the earliest one wins ties.
    ///
    /// A `NaN` position never leads while any individual has a real one.
    pub fn lead_individual(&self) -> Result<&Individual> {
        let mut active = self.active.iter();
        let mut lead = active.next().ok_or(GeneticCarsError::EmptyPopulation)?;
        for individual in active {
            let x = individual.last_position();
            if x > lead.last_position() || (lead.last_position().is_nan() && !x.is_nan()) {
                lead = individual;
            }
        }
        Ok(lead)
    }

    /// Retire every remaining active individual into the archive.
    pub fn cull_remaining(&mut self) -> Vec<Individual> {
        let mut culled: Vec<Individual> = self.active.drain(..).collect();
        for individual in culled.iter_mut() {
            individual.retire();
        }
        if !culled.is_empty() {
            debug!(
                "Culled {} individuals from generation {}",
                culled.len(),
                self.generation
            );
        }
        self.dead_archive.extend(culled.iter().cloned());
        culled
    }

    /// Hand over this generation's dead individuals, leaving the archive empty.
    pub fn drain_dead_archive(&mut self) -> Vec<Individual> {
        std::mem::take(&mut self.dead_archive)
    }

    pub fn active(&self) -> &[Individual] {
        &self.active
    }

    pub fn dead_archive(&self) -> &[Individual] {
        &self.dead_archive
    }

    /// 1-based index of the current generation; 0 before the first spawn.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn generation_size(&self) -> usize {
        self.generation_size
    }

    pub fn stagnation_timeout(&self) -> u64 {
        self.stagnation_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::GenomeDomain;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genomes(n: usize) -> Vec<Genome> {
        let mut rng = StdRng::seed_from_u64(5);
        let domain = GenomeDomain::default();
        (0..n).map(|_| Genome::random(&domain, &mut rng)).collect()
    }

    fn positions(manager: &PopulationManager, value: f64) -> HashMap<IndividualId, f64> {
        manager.active().iter().map(|i| (i.id(), value)).collect()
    }

    #[test]
    fn test_spawn_rejects_wrong_count() {
        let mut manager = PopulationManager::new(10, 5000);
        let result = manager.spawn_generation(genomes(9), 0);
        assert!(matches!(
            result,
            Err(GeneticCarsError::SizeMismatch { expected: 10, actual: 9 })
        ));
        assert_eq!(manager.generation(), 0);
        assert!(manager.active().is_empty());
    }

    #[test]
    fn test_spawn_while_alive_fails() {
        let mut manager = PopulationManager::new(3, 5000);
        manager.spawn_generation(genomes(3), 0).unwrap();
        assert!(matches!(
            manager.spawn_generation(genomes(3), 0),
            Err(GeneticCarsError::GenerationInProgress { .. })
        ));
    }

    #[test]
    fn test_missing_position_leaves_state_untouched() {
        let mut manager = PopulationManager::new(3, 5000);
        manager.spawn_generation(genomes(3), 0).unwrap();

        let mut feed = positions(&manager, 0.0);
        let dropped = manager.active()[2].id();
        feed.remove(&dropped);

        let result = manager.tick(&feed, 10_000);
        assert!(matches!(result, Err(GeneticCarsError::MissingPosition(id)) if id == dropped));
        assert_eq!(manager.active().len(), 3);
        assert!(manager.dead_archive().is_empty());
    }

    #[test]
    fn test_ids_unique_across_generations() {
        let mut manager = PopulationManager::new(2, 10);
        manager.spawn_generation(genomes(2), 0).unwrap();
        let first: Vec<_> = manager.active().iter().map(|i| i.id()).collect();

        manager.cull_remaining();
        manager.drain_dead_archive();
        manager.spawn_generation(genomes(2), 0).unwrap();

        assert_eq!(manager.generation(), 2);
        for ind in manager.active() {
            assert!(!first.contains(&ind.id()));
            assert_eq!(ind.generation(), 2);
        }
    }

    #[test]
    fn test_spawn_over_undrained_archive_fails() {
        let mut manager = PopulationManager::new(2, 10);
        manager.spawn_generation(genomes(2), 0).unwrap();
        manager.cull_remaining();
        assert_eq!(manager.dead_archive().len(), 2);

        assert!(matches!(
            manager.spawn_generation(genomes(2), 0),
            Err(GeneticCarsError::UndrainedArchive { generation: 1, dead: 2 })
        ));
        assert_eq!(manager.generation(), 1);
        assert_eq!(manager.dead_archive().len(), 2);

        manager.drain_dead_archive();
        manager.spawn_generation(genomes(2), 0).unwrap();
        assert_eq!(manager.generation(), 2);
    }

    #[test]
    fn test_lead_on_empty_population() {
        let manager = PopulationManager::new(10, 5000);
        assert!(matches!(
            manager.lead_individual(),
            Err(GeneticCarsError::EmptyPopulation)
        ));
    }
}
