//! Risk-index aggregation across the complete location set.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core_types::Location;
use crate::cycle::CycleResult;
use crate::error::{Result, RiskError};

/// Terminal per-location artifact: raw and normalized cycle counts combined
/// with the externally supplied susceptibility into a final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    /// Join key of the location.
    pub key: String,
    /// Raw completed-cycle count.
    pub cycles: u32,
    /// Cycle count normalized against the run-wide maximum.
    pub cycles_norm: f64,
    /// Externally supplied baseline susceptibility.
    pub susceptibility: f64,
    /// Final risk score: sqrt(normalized cycles × susceptibility).
    pub score: f64,
}

/// Combines all locations' cycle counts with their susceptibility values.
///
/// This is a hard synchronization point: the normalization denominator is the
/// maximum cycle count across the whole run, so aggregation is a batch
/// reduction over the complete location set, never a streaming step.
#[derive(Debug, Clone, Copy)]
pub struct RiskAggregator;

impl RiskAggregator {
    /// Aggregate the full set of cycle results into risk records.
    ///
    /// Every susceptibility value is validated before any score is computed;
    /// a negative value fails the whole batch with
    /// [`RiskError::InvalidInput`] and produces no records.
    pub fn aggregate(
        results: &[CycleResult],
        locations: &FxHashMap<String, Location>,
    ) -> Result<FxHashMap<String, RiskRecord>> {
        for result in results {
            let location = locations.get(&result.key).ok_or_else(|| {
                RiskError::InvalidInput(format!("no location record for key '{}'", result.key))
            })?;
            if location.susceptibility < 0.0 {
                return Err(RiskError::InvalidInput(format!(
                    "negative susceptibility {} for location '{}'",
                    location.susceptibility, result.key
                )));
            }
        }

        let max_cycles = results.iter().map(|r| r.cycles).max().unwrap_or(0);

        let mut records = FxHashMap::default();
        for result in results {
            let susceptibility = locations[&result.key].susceptibility;
            // all-zero runs normalize to zero everywhere, by definition
            let cycles_norm = if max_cycles == 0 {
                0.0
            } else {
                f64::from(result.cycles) / f64::from(max_cycles)
            };
            let score = (cycles_norm * susceptibility).sqrt();
            records.insert(
                result.key.clone(),
                RiskRecord {
                    key: result.key.clone(),
                    cycles: result.cycles,
                    cycles_norm,
                    susceptibility,
                    score,
                },
            );
        }
        Ok(records)
    }
}
