//! Reshaping of raw irregular satellite samples into clean daily series.

use nalgebra::Point2;

use crate::config::DateWindow;
use crate::core_types::{DayReduction, Location, RawSample, Signal};
use crate::error::{Result, RiskError};

use super::daily::DailySeries;

/// One signal's gap-filled daily series for one location, tagged with the
/// location's join key and coordinates so downstream joins can verify they
/// are still talking about the same point.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedSeries {
    /// Join key of the owning location.
    pub key: String,
    /// Coordinates of the owning location.
    pub coords: Point2<f64>,
    /// Which signal the series carries.
    pub signal: Signal,
    /// The gap-free daily values.
    pub series: DailySeries,
}

/// Turns one location's raw irregular samples for one signal into a clean,
/// calendar-indexed daily series covering every day of the run window.
///
/// Processing order: unit conversion, per-day reduction (mean for duplicate
/// daily observations, sum for sub-daily precipitation), linear interpolation
/// of interior gaps, nearest-value carry at the window boundaries. Pure
/// transform, no I/O.
#[derive(Debug, Clone, Copy)]
pub struct SeriesBuilder {
    window: DateWindow,
}

impl SeriesBuilder {
    /// Create a builder for the given run window.
    #[must_use]
    pub fn new(window: DateWindow) -> Self {
        SeriesBuilder { window }
    }

    /// Build the daily series for `signal` at `location`.
    ///
    /// Fails with [`RiskError::InsufficientData`] when no sample falls inside
    /// the window, since there is nothing to interpolate from.
    pub fn build(
        &self,
        signal: Signal,
        samples: &[RawSample],
        location: &Location,
    ) -> Result<LocatedSeries> {
        let num_days = self.window.num_days();
        let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); num_days];

        for sample in samples {
            let Some(date) = sample.date() else {
                continue;
            };
            let Some(offset) = self.window.day_offset(date) else {
                continue;
            };
            // undecodable observations (e.g. -9999 sentinels) count as missing
            let Some(value) = signal.convert(sample.value) else {
                continue;
            };
            buckets[offset].push(value);
        }

        let mut days: Vec<Option<f64>> = buckets
            .iter()
            .map(|bucket| reduce_day(signal, bucket))
            .collect();

        if days.iter().all(Option::is_none) {
            return Err(RiskError::InsufficientData {
                key: location.key.clone(),
                signal,
            });
        }

        fill_gaps(&mut days);

        let values: Vec<f64> = days.into_iter().map(Option::unwrap_or_default).collect();

        Ok(LocatedSeries {
            key: location.key.clone(),
            coords: location.coords,
            signal,
            series: DailySeries::from_values(self.window.start(), values),
        })
    }
}

/// Collapse one day's converted samples per the signal's reduction rule.
fn reduce_day(signal: Signal, bucket: &[f64]) -> Option<f64> {
    if bucket.is_empty() {
        return None;
    }
    let total: f64 = bucket.iter().sum();
    match signal.info().reduction {
        DayReduction::Sum => Some(total),
        DayReduction::Mean => Some(total / bucket.len() as f64),
    }
}

/// Fill missing days in place: linear interpolation between the nearest known
/// neighbors, nearest-value carry where a gap touches the range boundary.
/// At least one day must be known.
fn fill_gaps(days: &mut [Option<f64>]) {
    let first_known = days.iter().position(Option::is_some).expect("one known day");
    let last_known = days.iter().rposition(Option::is_some).expect("one known day");

    let head = days[first_known].expect("known");
    for day in days.iter_mut().take(first_known) {
        *day = Some(head);
    }
    let tail = days[last_known].expect("known");
    for day in days.iter_mut().skip(last_known + 1) {
        *day = Some(tail);
    }

    let mut prev_known = first_known;
    for i in first_known + 1..=last_known {
        if days[i].is_some() {
            let gap = i - prev_known;
            if gap > 1 {
                let lo = days[prev_known].expect("known");
                let hi = days[i].expect("known");
                for (step, day) in days[prev_known + 1..i].iter_mut().enumerate() {
                    let t = (step + 1) as f64 / gap as f64;
                    *day = Some(lo + (hi - lo) * t);
                }
            }
            prev_known = i;
        }
    }
}
