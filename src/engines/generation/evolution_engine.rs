use crate::config::evolution::{EvolutionConfig, ReplacementPolicy};
use crate::config::traits::ConfigSection;
use crate::engines::generation::{
    breeding::{rank_by_fitness, BreedingStrategy},
    genome::Genome,
    individual::{Individual, IndividualId},
    population::PopulationManager,
};
use crate::engines::simulation::{body::BodyBuilder, clock::Clock, clock::Timestamp};
use crate::error::{GeneticCarsError, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of one finished generation, kept for consumers such as a UI.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub best_genome: Genome,
    pub ticks: usize,
    pub finished_at: Timestamp,
}

pub enum StepOutcome {
    Running { died: usize },
    GenerationComplete(GenerationSummary),
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_individual_died(&mut self, id: IndividualId, fitness: f64);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
}

/// Drives the genetic algorithm against a physics collaborator.
///
/// Each `step` reads every active body's forward position, advances the
/// population, releases bodies of individuals that stalled, and rolls over
/// to a new generation once nobody is left. The host owns the physics
/// stepping and the clock; the engine only reads them.
pub struct EvolutionEngine<B: BodyBuilder, C: Clock> {
    config: EvolutionConfig,
    population: PopulationManager,
    breeding: BreedingStrategy,
    bodies: B,
    clock: C,
    handles: HashMap<IndividualId, B::Handle>,
    rng: StdRng,
    history: Vec<GenerationSummary>,
    ticks_this_generation: usize,
}

impl<B: BodyBuilder, C: Clock> EvolutionEngine<B, C> {
    pub fn new(config: EvolutionConfig, bodies: B, clock: C) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            population: PopulationManager::new(config.generation_size, config.stagnation_timeout),
            breeding: BreedingStrategy::new(&config),
            config,
            bodies,
            clock,
            handles: HashMap::new(),
            rng,
            history: Vec::new(),
            ticks_this_generation: 0,
        })
    }

    /// Seed the first generation with random genomes.
    pub fn start<P: ProgressCallback>(&mut self, callback: &mut P) -> Result<()> {
        if self.population.generation() != 0 {
            return Err(GeneticCarsError::GenerationInProgress {
                generation: self.population.generation(),
                active: self.population.active().len(),
            });
        }
        let genomes = self.breeding.seed(&mut self.rng);
        self.spawn(genomes, callback)
    }

    /// Run one tick. Starts the run on first call.
    pub fn step<P: ProgressCallback>(&mut self, callback: &mut P) -> Result<StepOutcome> {
        if self.population.generation() == 0 {
            self.start(callback)?;
        }

        let positions: HashMap<IndividualId, f64> = self
            .population
            .active()
            .iter()
            .filter_map(|ind| {
                self.handles
                    .get(&ind.id())
                    .map(|handle| (ind.id(), self.bodies.forward_position(handle)))
            })
            .collect();

        let died = self.population.tick(&positions, self.clock.now())?;
        self.ticks_this_generation += 1;
        self.release_bodies(&died, callback);

        if self.population.is_generation_over() {
            let summary = self.roll_over(callback)?;
            return Ok(StepOutcome::GenerationComplete(summary));
        }

        Ok(StepOutcome::Running { died: died.len() })
    }

    /// End the current generation now, retiring everyone still alive.
    pub fn abort_generation<P: ProgressCallback>(&mut self, callback: &mut P) -> Result<GenerationSummary> {
        let culled = self.population.cull_remaining();
        self.release_bodies(&culled, callback);
        self.roll_over(callback)
    }

    fn release_bodies<P: ProgressCallback>(&mut self, dead: &[Individual], callback: &mut P) {
        for individual in dead {
            if let Some(handle) = self.handles.remove(&individual.id()) {
                self.bodies.release(handle);
            }
            callback.on_individual_died(individual.id(), individual.fitness());
        }
    }

    /// Summarise the finished generation and spawn its successor.
    fn roll_over<P: ProgressCallback>(&mut self, callback: &mut P) -> Result<GenerationSummary> {
        let archive = self.population.drain_dead_archive();
        let summary = self.summarise(&archive)?;
        callback.on_generation_complete(&summary);
        self.history.push(summary.clone());

        let genomes = match self.config.replacement {
            ReplacementPolicy::Bred => self.breeding.breed(&archive, &mut self.rng)?,
            ReplacementPolicy::Random => {
                debug!("Reseeding generation randomly, discarding {} archived", archive.len());
                self.breeding.seed(&mut self.rng)
            }
        };

        self.spawn(genomes, callback)?;
        Ok(summary)
    }

    fn summarise(&self, archive: &[Individual]) -> Result<GenerationSummary> {
        let ranked = rank_by_fitness(archive);
        let (best_genome, best_fitness) = ranked.first().ok_or(GeneticCarsError::EmptyPopulation)?;
        let mean_fitness = ranked.iter().map(|(_, f)| f).sum::<f64>() / ranked.len() as f64;

        Ok(GenerationSummary {
            generation: self.population.generation(),
            best_fitness: *best_fitness,
            mean_fitness,
            best_genome: (*best_genome).clone(),
            ticks: self.ticks_this_generation,
            finished_at: self.clock.now(),
        })
    }

    fn spawn<P: ProgressCallback>(&mut self, genomes: Vec<Genome>, callback: &mut P) -> Result<()> {
        let now = self.clock.now();
        let spawned = self.population.spawn_generation(genomes, now)?;
        for individual in spawned {
            let handle = self.bodies.build(individual.genome());
            self.handles.insert(individual.id(), handle);
        }
        self.ticks_this_generation = 0;

        info!(
            "Generation {} on the track ({} bodies)",
            self.population.generation(),
            self.handles.len()
        );
        callback.on_generation_start(self.population.generation());
        Ok(())
    }

    /// Read-only view of the individuals still driving.
    pub fn active(&self) -> &[Individual] {
        self.population.active()
    }

    pub fn lead_individual(&self) -> Result<&Individual> {
        self.population.lead_individual()
    }

    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    pub fn history(&self) -> &[GenerationSummary] {
        &self.history
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn bodies(&self) -> &B {
        &self.bodies
    }

    /// Mutable access for the host to step its physics between ticks.
    pub fn bodies_mut(&mut self) -> &mut B {
        &mut self.bodies
    }

    pub fn handle(&self, id: IndividualId) -> Option<&B::Handle> {
        self.handles.get(&id)
    }
}
