//! Reproductive-cycle counting over one location's daily temperatures.
//!
//! The simulator scans a location's series in chronological order and counts
//! completed generations. Accrual starts once a warm streak of qualifying
//! days is established; progress accumulates as the inverse of the
//! temperature-dependent incubation period and is evaluated at adult-lifespan
//! window boundaries. A single day below the reset threshold destroys all
//! accumulated progress.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core_types::Celsius;
use crate::error::{Result, RiskError};

/// Cumulative progress that converts into one completed cycle at a window
/// boundary.
pub const CYCLE_COMPLETION: f64 = 0.99;

/// Fixed biological constants of the cycle model. One set per run, never
/// varied per location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleParams {
    /// Below this temperature all accumulated progress resets.
    pub reset_threshold: Celsius,
    /// Minimum daily temperature for a day to count toward the warm streak.
    pub eclosion_threshold: Celsius,
    /// Consecutive qualifying days required before incubation accrual starts.
    pub warm_streak_len: u32,
    /// Intercept of the incubation-period linear model.
    pub incubation_intercept: f64,
    /// Slope of the incubation-period linear model, divided by temperature.
    pub incubation_slope: f64,
    /// Adult lifespan in days; the window length at which accumulated
    /// progress is evaluated.
    pub adult_lifespan: u32,
}

impl Default for CycleParams {
    fn default() -> Self {
        CycleParams {
            reset_threshold: Celsius::new(5.0),
            eclosion_threshold: Celsius::new(12.0),
            warm_streak_len: 20,
            incubation_intercept: -91.7,
            incubation_slope: 10374.0,
            adult_lifespan: 20,
        }
    }
}

impl CycleParams {
    /// Reject degenerate parameter sets. The incubation model divides by the
    /// day's temperature, which a non-positive eclosion threshold would allow
    /// to be zero.
    pub fn validate(&self) -> Result<()> {
        if *self.eclosion_threshold <= 0.0 {
            return Err(RiskError::InvalidInput(
                "eclosion threshold must be above 0°C".to_string(),
            ));
        }
        if self.warm_streak_len == 0 || self.adult_lifespan == 0 {
            return Err(RiskError::InvalidInput(
                "warm-streak length and adult lifespan must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Daily incubation progress at temperature `t`: the fraction of the
    /// extrinsic incubation period `EIP(t) = (intercept + slope / t) / 24`
    /// completed in one day.
    fn daily_progress(&self, t: Celsius) -> f64 {
        let eip = (self.incubation_intercept + self.incubation_slope / *t) / 24.0;
        1.0 / eip
    }
}

/// Mutable accumulator for one location's scan. Created fresh per location
/// and never shared or reused across locations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleState {
    /// Days at/above the eclosion threshold since the last hard reset.
    warm_streak: u32,
    /// One-based day index at which the warm streak first reached the
    /// required length.
    streak_start: Option<u32>,
    /// Cumulative incubation progress inside the current lifespan window.
    progress: f64,
    /// Completed cycles so far.
    cycles: u32,
}

impl CycleState {
    /// Completed cycles so far.
    #[must_use]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Advance the state by one day. `day` is the one-based index of the day
    /// within the scan; `temp` is that day's temperature.
    pub fn step(&mut self, params: &CycleParams, day: u32, temp: Celsius) {
        if temp >= params.eclosion_threshold {
            self.warm_streak += 1;
            if self.warm_streak >= params.warm_streak_len {
                let start = *self.streak_start.get_or_insert(day);
                self.progress += params.daily_progress(temp);
                let elapsed = day - start;
                if elapsed != 0 && elapsed % params.adult_lifespan == 0 {
                    if self.progress >= CYCLE_COMPLETION {
                        self.cycles += 1;
                    }
                    // progress never carries past a lifespan window boundary
                    self.progress = 0.0;
                }
            }
        } else if temp < params.reset_threshold {
            // a cold day destroys everything accumulated, streak included
            self.warm_streak = 0;
            self.streak_start = None;
            self.progress = 0.0;
        }
        // between the thresholds the streak merely pauses
    }
}

/// Per-location result of the cycle scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleResult {
    /// Join key of the location.
    pub key: String,
    /// Completed cycles over the scanned series.
    pub cycles: u32,
}

/// Scans daily temperature series and counts completed reproductive cycles.
/// Performs no I/O; a fresh [`CycleState`] is created per scan.
#[derive(Debug, Clone, Copy)]
pub struct CycleSimulator {
    params: CycleParams,
}

impl CycleSimulator {
    /// Create a simulator after validating the parameter set.
    pub fn new(params: CycleParams) -> Result<Self> {
        params.validate()?;
        Ok(CycleSimulator { params })
    }

    /// Simulator with the model's published constants.
    #[must_use]
    pub fn with_defaults() -> Self {
        CycleSimulator {
            params: CycleParams::default(),
        }
    }

    /// The active parameter set.
    #[must_use]
    pub fn params(&self) -> &CycleParams {
        &self.params
    }

    /// Scan one location's daily temperatures in chronological order.
    ///
    /// `days` must be consecutive calendar days; a gapped or out-of-order
    /// input indicates a broken upstream contract and fails with
    /// [`RiskError::InvariantViolation`].
    pub fn simulate(&self, key: &str, days: &[(NaiveDate, f64)]) -> Result<CycleResult> {
        let mut state = CycleState::default();
        let mut prev: Option<NaiveDate> = None;
        for (i, &(date, temp)) in days.iter().enumerate() {
            if let Some(prev) = prev {
                if Some(date) != prev.succ_opt() {
                    return Err(RiskError::InvariantViolation {
                        key: key.to_string(),
                        detail: format!("day {date} does not follow {prev}"),
                    });
                }
            }
            prev = Some(date);
            state.step(&self.params, (i + 1) as u32, Celsius::new(temp));
        }
        Ok(CycleResult {
            key: key.to_string(),
            cycles: state.cycles(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(start: NaiveDate, temps: &[f64]) -> Vec<(NaiveDate, f64)> {
        temps
            .iter()
            .enumerate()
            .map(|(i, &t)| (start + chrono::Days::new(i as u64), t))
            .collect()
    }

    #[test]
    fn daily_progress_matches_the_linear_model() {
        let params = CycleParams::default();
        // EIP(15°C) = (-91.7 + 10374/15) / 24 ≈ 24.996 days
        let progress = params.daily_progress(Celsius::new(15.0));
        assert_relative_eq!(progress, 1.0 / 24.995_833_333_333_332, epsilon = 1e-12);
    }

    #[test]
    fn warm_streak_must_build_before_accrual() {
        let params = CycleParams::default();
        let mut state = CycleState::default();
        for d in 1..=19 {
            state.step(&params, d, Celsius::new(20.0));
        }
        assert_eq!(state.streak_start, None);
        assert_eq!(state.progress, 0.0);

        state.step(&params, 20, Celsius::new(20.0));
        assert_eq!(state.streak_start, Some(20));
        assert!(state.progress > 0.0);
    }

    #[test]
    fn mild_day_pauses_the_streak_without_reset() {
        let params = CycleParams::default();
        let mut state = CycleState::default();
        for d in 1..=10 {
            state.step(&params, d, Celsius::new(20.0));
        }
        // between reset (5) and eclosion (12): nothing changes
        state.step(&params, 11, Celsius::new(8.0));
        assert_eq!(state.warm_streak, 10);
        assert_eq!(state.streak_start, None);
    }

    #[test]
    fn cold_day_destroys_all_progress() {
        let params = CycleParams::default();
        let mut state = CycleState::default();
        for d in 1..=25 {
            state.step(&params, d, Celsius::new(20.0));
        }
        assert!(state.progress > 0.0);
        assert_eq!(state.streak_start, Some(20));

        state.step(&params, 26, Celsius::new(3.0));
        assert_eq!(state.warm_streak, 0);
        assert_eq!(state.streak_start, None);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn progress_does_not_carry_past_a_window_boundary() {
        let params = CycleParams::default();
        let mut state = CycleState::default();
        // 15°C accrues ≈0.04/day: the first window ends at day 40 with
        // ≈0.84 < 0.99, which is discarded rather than carried
        for d in 1..=40 {
            state.step(&params, d, Celsius::new(15.0));
        }
        assert_eq!(state.cycles(), 0);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn gapped_series_is_an_invariant_violation() {
        let simulator = CycleSimulator::with_defaults();
        let mut days = series(day(2020, 7, 21), &[20.0, 20.0, 20.0]);
        days.remove(1);
        let err = simulator.simulate("p1", &days).unwrap_err();
        assert!(matches!(err, RiskError::InvariantViolation { .. }));
    }

    #[test]
    fn zero_eclosion_threshold_is_rejected() {
        let params = CycleParams {
            eclosion_threshold: Celsius::new(0.0),
            ..CycleParams::default()
        };
        let err = CycleSimulator::new(params).unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput(_)));
    }

    #[test]
    fn simulate_is_idempotent_on_a_fixed_series() {
        let simulator = CycleSimulator::with_defaults();
        let days = series(day(2020, 7, 21), &[20.0; 80]);
        let first = simulator.simulate("p1", &days).unwrap();
        let second = simulator.simulate("p1", &days).unwrap();
        assert_eq!(first, second);
    }
}
