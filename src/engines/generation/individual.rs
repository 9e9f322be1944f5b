use crate::engines::generation::genome::Genome;
use crate::engines::simulation::clock::Timestamp;
use serde::Serialize;
use std::fmt;

/// Stable identity of an individual across a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndividualId(pub u64);

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleState {
    Alive,
    Dead,
}

/// A genome under evaluation plus its fitness and stagnation bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct Individual {
    id: IndividualId,
    generation: usize,
    genome: Genome,
    max_distance: f64,
    last_position: f64,
    last_progress_time: Timestamp,
    state: LifecycleState,
}

impl Individual {
    pub fn spawn(id: IndividualId, generation: usize, genome: Genome, now: Timestamp) -> Self {
        Self {
            id,
            generation,
            genome,
            max_distance: 0.0,
            last_position: 0.0,
            last_progress_time: now,
            state: LifecycleState::Alive,
        }
    }

    /// Apply one tick of position feedback.
    ///
    /// Returns `true` only on the tick the individual dies. Dead individuals
    /// ignore further feedback.
    pub fn observe(&mut self, position: f64, now: Timestamp, stagnation_timeout: u64) -> bool {
        if self.state == LifecycleState::Dead {
            return false;
        }

        self.last_position = position;

        // NaN compares false here, so it never counts as progress
        if position > self.max_distance {
            self.max_distance = position;
            self.last_progress_time = now;
            return false;
        }

        if now.saturating_sub(self.last_progress_time) > stagnation_timeout {
            self.state = LifecycleState::Dead;
            return true;
        }

        false
    }

    /// Mark dead without waiting for stagnation.
    pub fn retire(&mut self) {
        self.state = LifecycleState::Dead;
    }

    pub fn id(&self) -> IndividualId {
        self.id
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Fitness is the furthest forward position ever reached.
    pub fn fitness(&self) -> f64 {
        self.max_distance
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn last_position(&self) -> f64 {
        self.last_position
    }

    pub fn last_progress_time(&self) -> Timestamp {
        self.last_progress_time
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifecycleState::Alive
    }
}
