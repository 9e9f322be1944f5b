use super::traits::ConfigSection;
use crate::engines::generation::genome::GenomeDomain;
use crate::engines::generation::operators::SelectionMethod;
use crate::error::GeneticCarsError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub generation_size: usize,
    /// Time without forward progress after which an individual dies
    pub stagnation_timeout: u64,
    pub mutation_rate: f64,
    pub selection_method: SelectionMethod,
    /// Only the top N of a finished generation may become parents
    pub parent_pool_size: usize,
    pub tournament_size: usize,
    pub elitism_count: usize,
    pub replacement: ReplacementPolicy,
    pub seed: Option<u64>,
    pub domain: GenomeDomain,
}

/// Where the next generation's genomes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// Selection, crossover and mutation over the dead archive
    Bred,
    /// Throw the archive away and start over with random genomes
    Random,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            generation_size: 10,
            stagnation_timeout: 5000,
            mutation_rate: 0.05,
            selection_method: SelectionMethod::Roulette,
            parent_pool_size: 5,
            tournament_size: 3,
            elitism_count: 0,
            replacement: ReplacementPolicy::Bred,
            seed: None,
            domain: GenomeDomain::default(),
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GeneticCarsError> {
        if self.generation_size == 0 {
            return Err(GeneticCarsError::Configuration(
                "Generation size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GeneticCarsError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if self.parent_pool_size == 0 {
            return Err(GeneticCarsError::Configuration(
                "Parent pool size must be at least 1".to_string(),
            ));
        }
        if self.selection_method == SelectionMethod::Tournament && self.tournament_size == 0 {
            return Err(GeneticCarsError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if self.elitism_count > self.generation_size {
            return Err(GeneticCarsError::Configuration(format!(
                "Elitism count {} exceeds generation size {}",
                self.elitism_count, self.generation_size
            )));
        }
        self.domain.validate()
    }
}
