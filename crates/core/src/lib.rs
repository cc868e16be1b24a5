//! Environmental Reproductive-Cycle Risk Core Library
//!
//! Ingests per-location daily environmental time series (land-surface
//! temperature, precipitation) reconstructed from sparse satellite samples,
//! counts completed reproductive cycles of a temperature-sensitive organism
//! at each location over a one-year window, and combines the counts with an
//! externally supplied susceptibility into a normalized risk index.
//!
//! ## Pipeline
//!
//! Raw samples → [`series::SeriesBuilder`] (per signal, per point) →
//! [`series::SeriesAligner`] (per point, across signals) →
//! [`cycle::CycleSimulator`] (per point) → [`risk::RiskAggregator`]
//! (across all points).
//!
//! The GUI, the remote image-collection queries, and shapefile IO are
//! external collaborators: the core only sees already-fetched sample
//! collections and location records, and hands back tabular artifacts.

// Run configuration and calendar window
pub mod config;

// Leaf value types
pub mod core_types;

// The cycle-counting state machine
pub mod cycle;

// Error taxonomy
pub mod error;

// Persistence boundary (CSV artifacts)
pub mod export;

// Per-location orchestration
pub mod pipeline;

// Risk aggregation
pub mod risk;

// Time-series reshaping and alignment
pub mod series;

// Re-export the caller-facing surface
pub use config::{DateWindow, RunConfig, SignalSelection};
pub use core_types::{Celsius, Location, RawSample, Signal};
pub use cycle::{CycleParams, CycleResult, CycleSimulator, CycleState};
pub use error::{Result, RiskError};
pub use pipeline::{LocationInput, Pipeline, RunOutput, RunSummary};
pub use risk::{RiskAggregator, RiskRecord};
pub use series::{
    AlignedRecord, DailySeries, JoinPolicy, LocatedSeries, SeriesAligner, SeriesBuilder,
};
