pub mod genome;
pub mod individual;
pub mod operators;
pub mod population;
pub mod breeding;
pub mod evolution_engine;
pub mod progress;

pub use genome::{Attribute, Genome, GenomeDomain, Point, WheelSpec, ATTRIBUTE_COUNT};
pub use individual::{Individual, IndividualId, LifecycleState};
pub use operators::SelectionMethod;
pub use population::PopulationManager;
pub use breeding::BreedingStrategy;
pub use evolution_engine::{EvolutionEngine, GenerationSummary, ProgressCallback, StepOutcome};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage};
