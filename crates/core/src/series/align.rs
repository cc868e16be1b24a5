//! Merging of per-signal daily series into one aligned table per location.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core_types::Signal;
use crate::error::{Result, RiskError};

use super::builder::LocatedSeries;

/// What to do with days where an optional signal has no value because its
/// series does not cover them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinPolicy {
    /// Keep only days covered by every active signal (inner join by date).
    #[default]
    DropIncomplete,
    /// Keep every day covered by at least one signal; absent signals are
    /// simply missing from that day's value map.
    KeepPartial,
}

/// Per location, per day: the joined signal values plus the location key and
/// coordinates. Within one location there is exactly one record per calendar
/// day that survives the join.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRecord {
    /// Join key of the location.
    pub key: String,
    /// Location x coordinate (longitude).
    pub x: f64,
    /// Location y coordinate (latitude).
    pub y: f64,
    /// Calendar day of the record.
    pub date: NaiveDate,
    /// Signal values present on this day.
    pub values: FxHashMap<Signal, f64>,
}

/// Merges one location's per-signal daily series into aligned records keyed
/// by calendar date. Sub-daily precipitation arrives here already reduced to
/// daily totals by the builder's signal table, so this is a pure date join.
#[derive(Debug, Clone, Copy)]
pub struct SeriesAligner {
    policy: JoinPolicy,
}

impl SeriesAligner {
    /// Create an aligner with the given join policy.
    #[must_use]
    pub fn new(policy: JoinPolicy) -> Self {
        SeriesAligner { policy }
    }

    /// Align one location's series into per-day records, chronological order.
    ///
    /// With a single input series the output day range equals that series'
    /// range exactly, regardless of policy. Fails with
    /// [`RiskError::MergeKeyConflict`] if the inputs disagree on the location
    /// key.
    pub fn align(&self, series: &[LocatedSeries]) -> Result<Vec<AlignedRecord>> {
        let Some(first) = series.first() else {
            return Ok(Vec::new());
        };
        for other in &series[1..] {
            if other.key != first.key {
                return Err(RiskError::MergeKeyConflict {
                    expected: first.key.clone(),
                    found: other.key.clone(),
                });
            }
        }

        let range = match self.policy {
            JoinPolicy::DropIncomplete => {
                let start = series.iter().map(|s| s.series.start()).max();
                let end = series.iter().map(|s| s.series.end()).min();
                match (start, end) {
                    (Some(start), Some(end)) if start <= end => Some((start, end)),
                    _ => None,
                }
            }
            JoinPolicy::KeepPartial => {
                let start = series.iter().map(|s| s.series.start()).min();
                let end = series.iter().map(|s| s.series.end()).max();
                start.zip(end)
            }
        };
        let Some((start, end)) = range else {
            // disjoint ranges under an inner join
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        let mut date = start;
        while date <= end {
            let mut values = FxHashMap::default();
            for located in series {
                if let Some(value) = located.series.value_on(date) {
                    values.insert(located.signal, value);
                }
            }
            if !values.is_empty() {
                records.push(AlignedRecord {
                    key: first.key.clone(),
                    x: first.coords.x,
                    y: first.coords.y,
                    date,
                    values,
                });
            }
            let Some(next) = date.succ_opt() else { break };
            date = next;
        }
        Ok(records)
    }
}
