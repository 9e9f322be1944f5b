use crate::config::evolution::EvolutionConfig;
use crate::engines::generation::genome::{Genome, GenomeDomain};
use crate::engines::generation::individual::Individual;
use crate::engines::generation::operators::{select_parent, SelectionMethod};
use crate::error::{GeneticCarsError, Result};
use log::debug;
use rand::Rng;

/// Produces the next generation's genomes from a finished generation.
///
/// Pure: the output depends only on the archive passed in and the RNG state.
#[derive(Debug, Clone)]
pub struct BreedingStrategy {
    generation_size: usize,
    mutation_rate: f64,
    selection_method: SelectionMethod,
    parent_pool_size: usize,
    tournament_size: usize,
    elitism_count: usize,
    domain: GenomeDomain,
}

impl BreedingStrategy {
    pub fn new(config: &EvolutionConfig) -> Self {
        Self {
            generation_size: config.generation_size,
            mutation_rate: config.mutation_rate,
            selection_method: config.selection_method,
            parent_pool_size: config.parent_pool_size,
            tournament_size: config.tournament_size,
            elitism_count: config.elitism_count,
            domain: config.domain.clone(),
        }
    }

    /// Fully random genomes, used for the first generation.
    pub fn seed<R: Rng>(&self, rng: &mut R) -> Vec<Genome> {
        (0..self.generation_size)
            .map(|_| Genome::random(&self.domain, rng))
            .collect()
    }

    /// Breed `generation_size` children from the dead archive.
    pub fn breed<R: Rng>(&self, archive: &[Individual], rng: &mut R) -> Result<Vec<Genome>> {
        if archive.is_empty() {
            return Err(GeneticCarsError::EmptyPopulation);
        }

        let ranked = rank_by_fitness(archive);
        let pool_size = self.parent_pool_size.clamp(1, ranked.len());
        let pool = &ranked[..pool_size];

        let mut next_generation: Vec<Genome> = ranked
            .iter()
            .take(self.elitism_count.min(self.generation_size))
            .map(|(genome, _)| (*genome).clone())
            .collect();

        while next_generation.len() < self.generation_size {
            let parent1 = select_parent(pool, self.selection_method, self.tournament_size, rng);
            let parent2 = select_parent(pool, self.selection_method, self.tournament_size, rng);

            let child = parent1
                .crossover(parent2, rng)
                .mutate(self.mutation_rate, &self.domain, rng);
            next_generation.push(child);
        }

        debug!(
            "Bred {} genomes from archive of {} (best fitness {:.3})",
            next_generation.len(),
            archive.len(),
            ranked[0].1
        );

        Ok(next_generation)
    }

    pub fn domain(&self) -> &GenomeDomain {
        &self.domain
    }

    pub fn generation_size(&self) -> usize {
        self.generation_size
    }
}

/// Genomes with their fitness, best first. Equal fitness keeps archive order.
pub fn rank_by_fitness(archive: &[Individual]) -> Vec<(&Genome, f64)> {
    let mut ranked: Vec<(&Genome, f64)> = archive
        .iter()
        .map(|ind| (ind.genome(), ind.fitness()))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
