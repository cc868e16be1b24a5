//! Geographic points of interest, owned by the caller for the whole run.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One geographic point of interest. Immutable for the duration of a run;
/// the core references it by key everywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique join key taken from a caller-chosen field.
    pub key: String,
    /// Longitude/latitude coordinates (pass-through, no CRS handling).
    pub coords: Point2<f64>,
    /// Externally supplied baseline susceptibility, consumed only by the
    /// risk aggregation step. Expected non-negative.
    pub susceptibility: f64,
}

impl Location {
    /// Create a new location record.
    #[must_use]
    pub fn new(key: impl Into<String>, x: f64, y: f64, susceptibility: f64) -> Self {
        Location {
            key: key.into(),
            coords: Point2::new(x, y),
            susceptibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_kept_verbatim() {
        let loc = Location::new("p1", -58.4, -34.6, 0.7);
        assert_eq!(loc.key, "p1");
        assert_eq!(loc.coords.x, -58.4);
        assert_eq!(loc.coords.y, -34.6);
        assert_eq!(loc.susceptibility, 0.7);
    }
}
