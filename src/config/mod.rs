pub mod traits;
pub mod evolution;
pub mod simulation;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, ReplacementPolicy};
pub use simulation::{SimulationConfig, TrackConfig};
