use crate::engines::generation::genome::Genome;

/// Physics-side collaborator that turns genomes into simulated bodies.
///
/// The engine never looks inside a handle. It builds one body per spawned
/// individual, reads its forward position once per tick, and releases it
/// when the individual dies.
pub trait BodyBuilder {
    type Handle;

    fn build(&mut self, genome: &Genome) -> Self::Handle;

    fn release(&mut self, handle: Self::Handle);

    /// Current forward (x) position of the body's chassis.
    fn forward_position(&self, handle: &Self::Handle) -> f64;
}
