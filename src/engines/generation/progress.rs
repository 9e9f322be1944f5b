use super::evolution_engine::{GenerationSummary, ProgressCallback};
use super::individual::IndividualId;
use log::{debug, info};

/// Reports progress through the `log` facade.
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        info!("Generation {} starting...", generation);
    }

    fn on_individual_died(&mut self, id: IndividualId, fitness: f64) {
        debug!("  {} finished at {:.2}", id, fitness);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        info!(
            "Generation {} complete. Best distance: {:.2}, mean: {:.2}, ticks: {}",
            summary.generation, summary.best_fitness, summary.mean_fitness, summary.ticks
        );
    }
}

/// For handing progress to another thread (e.g. a renderer)
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone)]
pub enum ProgressMessage {
    GenerationStart(usize),
    IndividualDied { id: IndividualId, fitness: f64 },
    GenerationComplete(GenerationSummary),
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_individual_died(&mut self, id: IndividualId, fitness: f64) {
        let _ = self.sender.send(ProgressMessage::IndividualDied { id, fitness });
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(summary.clone()));
    }
}
