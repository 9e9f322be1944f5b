use super::traits::ConfigSection;
use crate::error::GeneticCarsError;
use serde::{Deserialize, Serialize};

/// Settings for the headless host loop and its stand-in track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated milliseconds per tick
    pub tick_millis: u64,
    pub max_generations: usize,
    /// Hard cap so a car that creeps forward forever cannot stall a run
    pub max_ticks_per_generation: usize,
    pub track: TrackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub motor_speed: f64,
    /// Bump height gained per unit of distance travelled
    pub roughness_growth: f64,
    pub max_bump_height: f64,
    pub bump_frequency: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_millis: 16,
            max_generations: 20,
            max_ticks_per_generation: 20_000,
            track: TrackConfig::default(),
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            motor_speed: 8.0,
            roughness_growth: 0.004,
            max_bump_height: 1.5,
            bump_frequency: 0.9,
        }
    }
}

impl ConfigSection for SimulationConfig {
    fn section_name() -> &'static str {
        "simulation"
    }

    fn validate(&self) -> Result<(), GeneticCarsError> {
        if self.tick_millis == 0 {
            return Err(GeneticCarsError::Configuration(
                "Tick length must be positive".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(GeneticCarsError::Configuration(
                "At least one generation must run".to_string(),
            ));
        }
        if self.max_ticks_per_generation == 0 {
            return Err(GeneticCarsError::Configuration(
                "Tick cap per generation must be positive".to_string(),
            ));
        }
        let track = &self.track;
        if !(track.motor_speed > 0.0 && track.motor_speed.is_finite()) {
            return Err(GeneticCarsError::Configuration(
                "Motor speed must be positive".to_string(),
            ));
        }
        if track.roughness_growth < 0.0 || track.max_bump_height < 0.0 || track.bump_frequency <= 0.0 {
            return Err(GeneticCarsError::Configuration(
                "Terrain parameters must be non-negative with a positive bump frequency".to_string(),
            ));
        }
        Ok(())
    }
}
