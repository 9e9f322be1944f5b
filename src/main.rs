use anyhow::Context;
use chrono::Utc;
use genetic_cars::config::ConfigManager;
use genetic_cars::engines::evaluation::KinematicTrack;
use genetic_cars::engines::generation::{EvolutionEngine, LogProgressCallback, StepOutcome};
use genetic_cars::engines::simulation::ManualClock;
use log::info;
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = env::args().nth(1).map(PathBuf::from);
    let manager = ConfigManager::new();
    manager
        .load_layered(config_path.as_deref())
        .context("loading configuration")?;
    let config = manager.get();

    let started = Utc::now();
    info!(
        "Run started at {} (seed: {:?}, generation size: {})",
        started.to_rfc3339(),
        config.evolution.seed,
        config.evolution.generation_size
    );

    let track = KinematicTrack::new(config.simulation.track.clone());
    let clock = ManualClock::new(0);
    let mut engine = EvolutionEngine::new(config.evolution.clone(), track, clock)?;
    let mut callback = LogProgressCallback;

    let dt_seconds = config.simulation.tick_millis as f64 / 1000.0;
    let mut ticks = 0;

    engine.start(&mut callback)?;
    while engine.history().len() < config.simulation.max_generations {
        // All bodies finish moving before the population sees any position
        engine.bodies_mut().advance(dt_seconds);
        engine.clock().advance(config.simulation.tick_millis);

        match engine.step(&mut callback)? {
            StepOutcome::GenerationComplete(_) => ticks = 0,
            StepOutcome::Running { .. } => {
                ticks += 1;
                if ticks >= config.simulation.max_ticks_per_generation {
                    info!("Tick cap reached, ending generation {}", engine.generation());
                    engine.abort_generation(&mut callback)?;
                    ticks = 0;
                }
            }
        }
    }

    let best = engine
        .history()
        .iter()
        .max_by(|a, b| a.best_fitness.total_cmp(&b.best_fitness))
        .context("no generation finished")?;

    info!(
        "Finished {} generations in {:.1}s wall time; best distance {:.2} in generation {}",
        engine.history().len(),
        (Utc::now() - started).num_milliseconds() as f64 / 1000.0,
        best.best_fitness,
        best.generation
    );
    println!("{}", best.best_genome.to_json()?);

    Ok(())
}
