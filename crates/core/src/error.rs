//! Error taxonomy of the pipeline.
//!
//! The one recoverable failure is a location with no usable data: the run
//! skips it, counts it, and moves on. Everything else indicates a broken
//! input set or configuration and aborts the run.

use thiserror::Error;

use crate::core_types::Signal;

/// All failure modes the pipeline can surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// A location has no usable sample for a requested signal inside the run
    /// window. Recoverable: the location is skipped.
    #[error("location '{key}' has no usable {signal} sample in the run window")]
    InsufficientData {
        /// Join key of the affected location.
        key: String,
        /// The signal that came up empty.
        signal: Signal,
    },

    /// Series handed to the aligner disagree on which location they belong to.
    #[error("merge key conflict: expected location '{expected}', found '{found}'")]
    MergeKeyConflict {
        /// Key of the first series.
        expected: String,
        /// The conflicting key.
        found: String,
    },

    /// An internal guarantee was broken, e.g. a non-consecutive day reached
    /// the cycle scan.
    #[error("invariant violated for location '{key}': {detail}")]
    InvariantViolation {
        /// Join key of the affected location.
        key: String,
        /// What went wrong.
        detail: String,
    },

    /// Caller-supplied data is unusable, e.g. a negative susceptibility.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The run configuration is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RiskError {
    /// Whether this error must abort the whole run. Only missing data is
    /// recoverable by skipping the affected location.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RiskError::InsufficientData { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RiskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_data_is_recoverable() {
        let missing = RiskError::InsufficientData {
            key: "p1".to_string(),
            signal: Signal::Temperature,
        };
        assert!(!missing.is_fatal());

        let conflict = RiskError::MergeKeyConflict {
            expected: "p1".to_string(),
            found: "p2".to_string(),
        };
        assert!(conflict.is_fatal());
        assert!(RiskError::InvalidInput("bad".to_string()).is_fatal());
        assert!(RiskError::Configuration("bad".to_string()).is_fatal());
    }

    #[test]
    fn messages_name_the_location() {
        let err = RiskError::InsufficientData {
            key: "p7".to_string(),
            signal: Signal::Temperature,
        };
        assert!(err.to_string().contains("p7"));
        assert!(err.to_string().contains("temperature"));
    }
}
