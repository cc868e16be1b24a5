//! Closed set of remote-sensing signals the pipeline understands.
//!
//! Each variant carries its own source band name, native temporal resolution,
//! unit-conversion rule, and per-day reduction. Dispatch goes through a static
//! lookup table instead of string comparisons on collection identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::units::Celsius;

/// Native temporal resolution of a source collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// One observation per calendar day at most.
    Daily,
    /// Multiple observations per calendar day (e.g. half-hourly).
    SubDaily,
}

/// How a signal's same-day samples collapse into one daily value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayReduction {
    /// Average duplicate observations (daily collections).
    Mean,
    /// Total all observations on the day (sub-daily precipitation).
    Sum,
}

/// A remote-sensing signal requested for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// Daytime land-surface temperature (scaled Kelvin at the source).
    Temperature,
    /// Daily precipitation total in mm.
    RainDaily,
    /// Sub-daily calibrated precipitation in mm, summed to daily totals.
    RainSubDaily,
}

/// Static per-signal dispatch record.
pub struct SignalInfo {
    /// Band name inside the source collection.
    pub band: &'static str,
    /// Tag appended to the audit file name for this signal.
    pub file_tag: &'static str,
    /// Native temporal resolution.
    pub resolution: Resolution,
    /// Reduction applied to same-day samples.
    pub reduction: DayReduction,
}

/// Lookup table indexed by `Signal` discriminant order.
static SIGNAL_TABLE: [SignalInfo; 3] = [
    SignalInfo {
        band: "LST_Day_1km",
        file_tag: "LST_",
        resolution: Resolution::Daily,
        reduction: DayReduction::Mean,
    },
    SignalInfo {
        band: "precipitation",
        file_tag: "Chirps_",
        resolution: Resolution::Daily,
        reduction: DayReduction::Mean,
    },
    SignalInfo {
        band: "precipitationCal",
        file_tag: "IMERG_",
        resolution: Resolution::SubDaily,
        reduction: DayReduction::Sum,
    },
];

impl Signal {
    /// Every signal, in table order.
    pub const ALL: [Signal; 3] = [Signal::Temperature, Signal::RainDaily, Signal::RainSubDaily];

    /// Static dispatch record for this signal.
    #[must_use]
    pub fn info(self) -> &'static SignalInfo {
        &SIGNAL_TABLE[self as usize]
    }

    /// Band name inside the source collection.
    #[must_use]
    pub fn band(self) -> &'static str {
        self.info().band
    }

    /// Convert a source-native sample value to the canonical unit
    /// (Celsius for temperature, mm passthrough for precipitation).
    ///
    /// `None` marks an undecodable observation, e.g. a temperature sentinel
    /// below absolute zero; callers treat it as a missing sample.
    #[must_use]
    pub fn convert(self, raw: f64) -> Option<f64> {
        match self {
            Signal::Temperature => Celsius::from_scaled_raw(raw).map(f64::from),
            Signal::RainDaily | Signal::RainSubDaily => Some(raw),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Temperature => "temperature",
            Signal::RainDaily => "daily precipitation",
            Signal::RainSubDaily => "sub-daily precipitation",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn table_dispatch_matches_source_bands() {
        assert_eq!(Signal::Temperature.band(), "LST_Day_1km");
        assert_eq!(Signal::RainDaily.band(), "precipitation");
        assert_eq!(Signal::RainSubDaily.band(), "precipitationCal");
        assert_eq!(Signal::RainSubDaily.info().resolution, Resolution::SubDaily);
        assert_eq!(Signal::RainSubDaily.info().reduction, DayReduction::Sum);
    }

    #[test]
    fn temperature_converts_precipitation_passes_through() {
        let celsius = Signal::Temperature.convert(15000.0).unwrap();
        assert_relative_eq!(celsius, 26.85, epsilon = 1e-9);
        assert_eq!(Signal::RainDaily.convert(3.5), Some(3.5));
        assert_eq!(Signal::RainSubDaily.convert(0.25), Some(0.25));
    }

    #[test]
    fn temperature_sentinel_is_not_a_value() {
        assert_eq!(Signal::Temperature.convert(-9999.0), None);
    }
}
