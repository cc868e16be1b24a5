//! Time-series reshaping: raw irregular samples to aligned daily tables.

pub mod align;
pub mod builder;
pub mod daily;

pub use align::{AlignedRecord, JoinPolicy, SeriesAligner};
pub use builder::{LocatedSeries, SeriesBuilder};
pub use daily::DailySeries;
