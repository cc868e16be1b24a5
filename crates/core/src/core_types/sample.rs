//! Raw observations as delivered by the remote data-retrieval collaborator.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// One observation from a remote collection: millisecond epoch timestamp plus
/// a value in the source's native unit. Samples for a location/signal pair
/// may arrive unordered, duplicated, or with gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Milliseconds since the Unix epoch (the source's convention, not seconds).
    pub timestamp_ms: i64,
    /// Observed value in the source's native unit.
    pub value: f64,
}

impl RawSample {
    /// Create a new raw sample.
    #[must_use]
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        RawSample {
            timestamp_ms,
            value,
        }
    }

    /// Calendar date (UTC) of the observation, or `None` for a timestamp
    /// outside the representable range.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        Some(DateTime::from_timestamp_millis(self.timestamp_ms)?.date_naive())
    }
}
