//! Run configuration and the calendar window derived from the target year.
//!
//! Everything here is validated before any computation (or remote query by
//! the caller) starts; a bad configuration never reaches the pipeline.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core_types::Signal;
use crate::error::{Result, RiskError};
use crate::series::JoinPolicy;

/// Which signals the run pulls from the remote collections. At least one
/// must be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalSelection {
    /// Land-surface temperature.
    pub temperature: bool,
    /// Daily precipitation.
    pub rain_daily: bool,
    /// Sub-daily precipitation.
    pub rain_sub_daily: bool,
}

impl SignalSelection {
    /// Whether any signal is active.
    #[must_use]
    pub fn any(&self) -> bool {
        self.temperature || self.rain_daily || self.rain_sub_daily
    }

    /// Active signals in table order.
    #[must_use]
    pub fn active(&self) -> Vec<Signal> {
        let mut signals = Vec::new();
        if self.temperature {
            signals.push(Signal::Temperature);
        }
        if self.rain_daily {
            signals.push(Signal::RainDaily);
        }
        if self.rain_sub_daily {
            signals.push(Signal::RainSubDaily);
        }
        signals
    }
}

/// Inclusive-start, exclusive-end calendar window of one run.
///
/// The window for a target year starts 201 days after 2 January of that year
/// and ends 202 days after 2 January of the following year, matching the
/// source collections' query convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window from explicit bounds (start inclusive, end exclusive).
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    /// The year-plus-one-year window for a target year.
    pub fn for_year(year: i32) -> Result<Self> {
        let base = NaiveDate::from_ymd_opt(year, 1, 2)
            .ok_or_else(|| RiskError::Configuration(format!("unrepresentable year {year}")))?;
        let next = NaiveDate::from_ymd_opt(year + 1, 1, 2).ok_or_else(|| {
            RiskError::Configuration(format!("year {year} has no representable successor"))
        })?;
        let start = base
            .checked_add_days(Days::new(201))
            .ok_or_else(|| RiskError::Configuration(format!("window overflow for year {year}")))?;
        let end = next
            .checked_add_days(Days::new(202))
            .ok_or_else(|| RiskError::Configuration(format!("window overflow for year {year}")))?;
        Ok(DateWindow { start, end })
    }

    /// First day of the window.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// One past the last day of the window.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered.
    #[must_use]
    pub fn num_days(&self) -> usize {
        let days = self.end.signed_duration_since(self.start).num_days();
        usize::try_from(days).unwrap_or(0)
    }

    /// Zero-based offset of `date` inside the window, if covered.
    #[must_use]
    pub fn day_offset(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date >= self.end {
            return None;
        }
        usize::try_from(date.signed_duration_since(self.start).num_days()).ok()
    }

    /// Iterate every day of the window in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days()).map(move |i| self.start + Days::new(i as u64))
    }
}

/// Caller-facing configuration surface, supplied by the excluded UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Target year; the run window spans into the following year.
    pub year: i32,
    /// Active signals.
    pub signals: SignalSelection,
    /// Name of the caller-chosen join-key field.
    pub key_field: String,
    /// Name of the caller-chosen susceptibility field.
    pub susceptibility_field: String,
    /// Whether the cycle/risk computation runs at all. Only meaningful with
    /// the temperature signal active.
    pub compute_risk: bool,
    /// How days with missing optional signals are treated in the join.
    pub join_policy: JoinPolicy,
}

impl RunConfig {
    /// Validate the configuration. Called before any work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.signals.any() {
            return Err(RiskError::Configuration(
                "no signal selected; at least one data source is required".to_string(),
            ));
        }
        if self.compute_risk && !self.signals.temperature {
            return Err(RiskError::Configuration(
                "risk computation requires the temperature signal".to_string(),
            ));
        }
        if self.key_field.is_empty() {
            return Err(RiskError::Configuration(
                "join-key field name is empty".to_string(),
            ));
        }
        if self.compute_risk && self.susceptibility_field.is_empty() {
            return Err(RiskError::Configuration(
                "susceptibility field name is empty".to_string(),
            ));
        }
        self.window().map(|_| ())
    }

    /// The run's calendar window.
    pub fn window(&self) -> Result<DateWindow> {
        DateWindow::for_year(self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> RunConfig {
        RunConfig {
            year: 2020,
            signals: SignalSelection {
                temperature: true,
                rain_daily: false,
                rain_sub_daily: false,
            },
            key_field: "id".to_string(),
            susceptibility_field: "Mapa_pr".to_string(),
            compute_risk: true,
            join_policy: JoinPolicy::default(),
        }
    }

    #[test]
    fn window_offsets_from_january_second() {
        let window = DateWindow::for_year(2020).unwrap();
        assert_eq!(window.start(), day(2020, 7, 21));
        assert_eq!(window.end(), day(2021, 7, 23));
        assert_eq!(window.num_days(), 367);
        assert_eq!(window.day_offset(day(2020, 7, 21)), Some(0));
        assert_eq!(window.day_offset(day(2021, 7, 22)), Some(366));
        assert_eq!(window.day_offset(day(2021, 7, 23)), None);
        assert_eq!(window.day_offset(day(2020, 7, 20)), None);
    }

    #[test]
    fn days_iterator_covers_the_whole_window() {
        let window = DateWindow::new(day(2020, 7, 21), day(2020, 7, 24));
        let days: Vec<NaiveDate> = window.days().collect();
        assert_eq!(
            days,
            vec![day(2020, 7, 21), day(2020, 7, 22), day(2020, 7, 23)]
        );
    }

    #[test]
    fn valid_configuration_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn no_signal_selected_is_rejected() {
        let mut cfg = config();
        cfg.signals = SignalSelection::default();
        cfg.compute_risk = false;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, RiskError::Configuration(_)));
    }

    #[test]
    fn risk_without_temperature_is_rejected() {
        let mut cfg = config();
        cfg.signals = SignalSelection {
            temperature: false,
            rain_daily: true,
            rain_sub_daily: false,
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, RiskError::Configuration(_)));
    }

    #[test]
    fn empty_field_names_are_rejected() {
        let mut cfg = config();
        cfg.key_field = String::new();
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.susceptibility_field = String::new();
        assert!(cfg.validate().is_err());

        // Without risk the susceptibility field is unused and may be empty
        let mut cfg = config();
        cfg.susceptibility_field = String::new();
        cfg.compute_risk = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn active_signals_follow_table_order() {
        let selection = SignalSelection {
            temperature: true,
            rain_daily: false,
            rain_sub_daily: true,
        };
        assert_eq!(
            selection.active(),
            vec![Signal::Temperature, Signal::RainSubDaily]
        );
    }
}
