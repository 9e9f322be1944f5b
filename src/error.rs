use thiserror::Error;

use crate::engines::generation::individual::IndividualId;

#[derive(Error, Debug)]
pub enum GeneticCarsError {
    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    #[error("Size mismatch: expected {expected} genomes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Empty population: no individuals to choose from")]
    EmptyPopulation,

    #[error("No position supplied for active individual {0}")]
    MissingPosition(IndividualId),

    #[error("Generation {generation} still has {active} active individuals")]
    GenerationInProgress { generation: usize, active: usize },

    #[error("Generation {generation} left {dead} individuals in the undrained archive")]
    UndrainedArchive { generation: usize, dead: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, GeneticCarsError>;
