pub mod track;

pub use track::{BodyHandle, KinematicTrack};
