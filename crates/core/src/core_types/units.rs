//! Semantic unit types for the physical quantities the pipeline passes around.
//!
//! Temperature is the only quantity with a non-trivial encoding: the remote
//! land-surface collection delivers scaled Kelvin (scale factor 0.02), which
//! is decoded to Celsius before anything downstream sees the value.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Temperature in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Absolute zero in Celsius.
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Celsius to Kelvin conversion offset (0°C = 273.15 K).
    const KELVIN_OFFSET: f64 = 273.15;

    /// Scale factor of the source collection's packed Kelvin encoding.
    const RAW_SCALE: f64 = 0.02;

    /// Create a new Celsius temperature. Asserts value >= absolute zero.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -Self::KELVIN_OFFSET,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Decode a scaled-Kelvin raw sample (`celsius = raw * 0.02 - 273.15`).
    ///
    /// Returns `None` when the decode lands below absolute zero, which only
    /// happens for sentinel/fill values (e.g. -9999) in the source
    /// collection; such observations carry no temperature.
    #[inline]
    #[must_use]
    pub fn from_scaled_raw(raw: f64) -> Option<Self> {
        let celsius = raw.mul_add(Self::RAW_SCALE, -Self::KELVIN_OFFSET);
        (celsius >= -Self::KELVIN_OFFSET).then_some(Celsius(celsius))
    }

    /// Get the raw f64 value.
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Celsius {
    fn from(v: f64) -> Self {
        Celsius::new(v)
    }
}

impl From<Celsius> for f64 {
    fn from(c: Celsius) -> f64 {
        c.0
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}
