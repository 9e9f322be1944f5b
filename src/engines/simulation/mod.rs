pub mod body;
pub mod clock;

pub use body::BodyBuilder;
pub use clock::{Clock, ManualClock, MonotonicClock, Timestamp};
