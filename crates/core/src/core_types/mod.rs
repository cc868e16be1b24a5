//! Leaf value types shared across the pipeline.

pub mod location;
pub mod sample;
pub mod signal;
pub mod units;

pub use location::Location;
pub use sample::RawSample;
pub use signal::{DayReduction, Resolution, Signal, SignalInfo};
pub use units::Celsius;
