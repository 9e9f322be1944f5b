//! Genetic algorithm engine that evolves two-wheeled vehicle designs.
//!
//! Genomes describe a chassis polygon and two wheels. Each generation is
//! driven on a track by an external physics collaborator; individuals die
//! once they stop making forward progress, and the furthest travellers are
//! recombined and mutated into the next generation.
//!
//! The core lives in [`engines::generation`]. Physics and time are reached
//! only through [`engines::simulation::BodyBuilder`] and
//! [`engines::simulation::Clock`].

pub mod config;
pub mod engines;
pub mod error;

pub use error::{GeneticCarsError, Result};
