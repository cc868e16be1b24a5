//! Per-location orchestration of the full pipeline.
//!
//! Each location runs builder → aligner → simulator independently, with no
//! shared mutable state, so the location loop is parallelized with rayon.
//! Risk aggregation happens afterwards as a batch reduction over the complete
//! result set.

use chrono::NaiveDate;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::config::{DateWindow, RunConfig};
use crate::core_types::{Location, RawSample, Signal};
use crate::cycle::{CycleParams, CycleResult, CycleSimulator};
use crate::error::{Result, RiskError};
use crate::risk::{RiskAggregator, RiskRecord};
use crate::series::{AlignedRecord, LocatedSeries, SeriesAligner, SeriesBuilder};

/// Everything the pipeline needs for one location: the location record plus
/// the caller-fetched raw samples per active signal. The remote query service
/// is an external collaborator; the core only sees its already-fetched output.
#[derive(Debug, Clone)]
pub struct LocationInput {
    /// The location record.
    pub location: Location,
    /// Raw samples per signal, as delivered by the retrieval collaborator.
    pub samples: FxHashMap<Signal, Vec<RawSample>>,
}

impl LocationInput {
    /// Input with no samples attached yet.
    #[must_use]
    pub fn new(location: Location) -> Self {
        LocationInput {
            location,
            samples: FxHashMap::default(),
        }
    }

    /// Attach one signal's raw samples.
    #[must_use]
    pub fn with_samples(mut self, signal: Signal, samples: Vec<RawSample>) -> Self {
        self.samples.insert(signal, samples);
        self
    }
}

/// Outcome counts surfaced to the caller instead of a per-sample log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Locations that produced aligned records.
    pub processed: usize,
    /// Locations skipped for lack of data.
    pub skipped: usize,
}

/// Terminal artifacts of one run.
#[derive(Debug)]
pub struct RunOutput {
    /// Per-location per-day joined signal rows, in input location order.
    pub records: Vec<AlignedRecord>,
    /// Risk records keyed by location, present when risk computation ran.
    pub risk: Option<FxHashMap<String, RiskRecord>>,
    /// Processed/skipped counts.
    pub summary: RunSummary,
}

/// Everything one location's independent unit of work produces.
struct LocationOutcome {
    records: Vec<AlignedRecord>,
    cycles: Option<CycleResult>,
}

/// The full run: series building and alignment per location, cycle counting
/// where temperature is active, and risk aggregation across all locations.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RunConfig,
    window: DateWindow,
    simulator: CycleSimulator,
}

impl Pipeline {
    /// Build a pipeline with the model's default cycle constants. Fails on an
    /// invalid configuration, before any work starts.
    pub fn new(config: RunConfig) -> Result<Self> {
        Self::with_params(config, CycleParams::default())
    }

    /// Build a pipeline with explicit cycle constants.
    pub fn with_params(config: RunConfig, params: CycleParams) -> Result<Self> {
        config.validate()?;
        let window = config.window()?;
        let simulator = CycleSimulator::new(params)?;
        Ok(Pipeline {
            config,
            window,
            simulator,
        })
    }

    /// The validated configuration.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The run's calendar window.
    #[must_use]
    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// Process every location and aggregate risk.
    ///
    /// Locations with insufficient data are skipped with a warning and
    /// counted in the summary; any other error aborts the run. Negative
    /// susceptibility values are rejected up front, before any series work.
    pub fn run(&self, inputs: &[LocationInput]) -> Result<RunOutput> {
        let run_risk = self.config.compute_risk && self.config.signals.temperature;

        if run_risk {
            for input in inputs {
                if input.location.susceptibility < 0.0 {
                    return Err(RiskError::InvalidInput(format!(
                        "negative susceptibility {} for location '{}'",
                        input.location.susceptibility, input.location.key
                    )));
                }
            }
        }

        info!(
            locations = inputs.len(),
            year = self.config.year,
            "starting run"
        );

        let outcomes: Vec<Result<LocationOutcome>> = inputs
            .par_iter()
            .map(|input| self.process_location(input, run_risk))
            .collect();

        let mut summary = RunSummary::default();
        let mut records = Vec::new();
        let mut results = Vec::new();
        for (input, outcome) in inputs.iter().zip(outcomes) {
            match outcome {
                Ok(outcome) => {
                    summary.processed += 1;
                    records.extend(outcome.records);
                    if let Some(result) = outcome.cycles {
                        results.push(result);
                    }
                }
                Err(err) if !err.is_fatal() => {
                    summary.skipped += 1;
                    warn!(key = %input.location.key, %err, "skipping location");
                }
                Err(err) => return Err(err),
            }
        }

        let risk = if run_risk {
            let locations: FxHashMap<String, Location> = inputs
                .iter()
                .map(|input| (input.location.key.clone(), input.location.clone()))
                .collect();
            Some(RiskAggregator::aggregate(&results, &locations)?)
        } else {
            None
        };

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            "run complete"
        );

        Ok(RunOutput {
            records,
            risk,
            summary,
        })
    }

    /// One location's independent unit of work: build every active signal's
    /// series, align them, and scan temperature for cycles when risk is on.
    fn process_location(&self, input: &LocationInput, run_risk: bool) -> Result<LocationOutcome> {
        debug!(key = %input.location.key, "processing location");
        let builder = SeriesBuilder::new(self.window);
        let aligner = SeriesAligner::new(self.config.join_policy);

        let mut series = Vec::new();
        let mut temperature: Option<LocatedSeries> = None;
        for signal in self.config.signals.active() {
            let samples = input.samples.get(&signal).map_or(&[][..], Vec::as_slice);
            let located = builder.build(signal, samples, &input.location)?;
            if signal == Signal::Temperature {
                temperature = Some(located.clone());
            }
            series.push(located);
        }

        let records = aligner.align(&series)?;

        let cycles = if run_risk {
            let temperature = temperature.expect("temperature signal active when risk is on");
            let days: Vec<(NaiveDate, f64)> = temperature.series.iter().collect();
            Some(self.simulator.simulate(&input.location.key, &days)?)
        } else {
            None
        };

        Ok(LocationOutcome { records, cycles })
    }
}
