//! End-to-end pipeline runs over synthetic satellite samples.

use chrono::NaiveDate;
use vector_risk_core::{
    DateWindow, JoinPolicy, Location, LocationInput, Pipeline, RawSample, RunConfig, Signal,
    SignalSelection,
};

/// Raw value encoding the given Celsius temperature in the source's scaled
/// Kelvin convention.
fn lst_raw(celsius: f64) -> f64 {
    (celsius + 273.15) / 0.02
}

fn noon_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp_millis()
}

/// One temperature sample per day of the window, at a constant temperature.
fn temp_samples(window: DateWindow, celsius: f64) -> Vec<RawSample> {
    window
        .days()
        .map(|date| RawSample::new(noon_ms(date), lst_raw(celsius)))
        .collect()
}

/// One daily-precipitation sample per day of the window.
fn rain_samples(window: DateWindow, mm: f64) -> Vec<RawSample> {
    window
        .days()
        .map(|date| RawSample::new(noon_ms(date), mm))
        .collect()
}

fn config(signals: SignalSelection, compute_risk: bool) -> RunConfig {
    RunConfig {
        year: 2020,
        signals,
        key_field: "id".to_string(),
        susceptibility_field: "Mapa_pr".to_string(),
        compute_risk,
        join_policy: JoinPolicy::default(),
    }
}

fn temperature_only() -> SignalSelection {
    SignalSelection {
        temperature: true,
        rain_daily: false,
        rain_sub_daily: false,
    }
}

#[test]
fn warm_and_cool_locations_rank_by_cycle_count() {
    let pipeline = Pipeline::new(config(temperature_only(), true)).unwrap();
    let window = pipeline.window();

    let inputs = [
        LocationInput::new(Location::new("warm", -58.4, -34.6, 1.0))
            .with_samples(Signal::Temperature, temp_samples(window, 28.0)),
        LocationInput::new(Location::new("cool", -68.3, -54.8, 0.8))
            .with_samples(Signal::Temperature, temp_samples(window, 10.0)),
    ];

    let output = pipeline.run(&inputs).unwrap();
    assert_eq!(output.summary.processed, 2);
    assert_eq!(output.summary.skipped, 0);

    let risk = output.risk.unwrap();
    assert_eq!(risk.len(), 2);
    assert!(risk["warm"].cycles > 0);
    assert_eq!(risk["warm"].cycles_norm, 1.0);
    assert_eq!(risk["warm"].score, 1.0);
    assert_eq!(risk["cool"].cycles, 0);
    assert_eq!(risk["cool"].score, 0.0);
}

#[test]
fn location_without_samples_is_skipped_not_fatal() {
    let pipeline = Pipeline::new(config(temperature_only(), true)).unwrap();
    let window = pipeline.window();

    let inputs = [
        LocationInput::new(Location::new("good", 0.0, 0.0, 0.5))
            .with_samples(Signal::Temperature, temp_samples(window, 25.0)),
        // no samples attached at all
        LocationInput::new(Location::new("empty", 1.0, 1.0, 0.5)),
    ];

    let output = pipeline.run(&inputs).unwrap();
    assert_eq!(output.summary.processed, 1);
    assert_eq!(output.summary.skipped, 1);

    let risk = output.risk.unwrap();
    assert!(risk.contains_key("good"));
    assert!(!risk.contains_key("empty"));
}

#[test]
fn sentinel_only_location_is_skipped_not_a_panic() {
    let pipeline = Pipeline::new(config(temperature_only(), true)).unwrap();
    let window = pipeline.window();

    // "bad" delivers nothing but the retrieval collaborator's fill value
    let sentinel = vec![RawSample::new(noon_ms(window.start()), -9999.0)];
    let inputs = [
        LocationInput::new(Location::new("good", 0.0, 0.0, 0.5))
            .with_samples(Signal::Temperature, temp_samples(window, 25.0)),
        LocationInput::new(Location::new("bad", 1.0, 1.0, 0.5))
            .with_samples(Signal::Temperature, sentinel),
    ];

    let output = pipeline.run(&inputs).unwrap();
    assert_eq!(output.summary.processed, 1);
    assert_eq!(output.summary.skipped, 1);
    assert!(!output.risk.unwrap().contains_key("bad"));
}

#[test]
fn single_signal_output_spans_the_window_exactly() {
    let pipeline = Pipeline::new(config(temperature_only(), false)).unwrap();
    let window = pipeline.window();

    let inputs = [LocationInput::new(Location::new("p1", 0.0, 0.0, 0.0))
        .with_samples(Signal::Temperature, temp_samples(window, 20.0))];

    let output = pipeline.run(&inputs).unwrap();
    assert!(output.risk.is_none());
    assert_eq!(output.records.len(), window.num_days());
    assert_eq!(output.records[0].date, window.start());
    assert_eq!(
        output.records.last().unwrap().date,
        window.days().last().unwrap()
    );
}

#[test]
fn joined_signals_share_each_daily_record() {
    let signals = SignalSelection {
        temperature: true,
        rain_daily: true,
        rain_sub_daily: false,
    };
    let pipeline = Pipeline::new(config(signals, true)).unwrap();
    let window = pipeline.window();

    let inputs = [LocationInput::new(Location::new("p1", 0.0, 0.0, 0.3))
        .with_samples(Signal::Temperature, temp_samples(window, 24.0))
        .with_samples(Signal::RainDaily, rain_samples(window, 2.5))];

    let output = pipeline.run(&inputs).unwrap();
    assert_eq!(output.records.len(), window.num_days());
    for record in &output.records {
        assert!((record.values[&Signal::Temperature] - 24.0).abs() < 1e-9);
        assert!((record.values[&Signal::RainDaily] - 2.5).abs() < f64::EPSILON);
    }

    // risk still runs off the temperature series
    let risk = output.risk.unwrap();
    assert!(risk["p1"].cycles > 0);
}

#[test]
fn missing_optional_signal_drops_the_location_under_inner_join() {
    let signals = SignalSelection {
        temperature: true,
        rain_daily: true,
        rain_sub_daily: false,
    };
    let pipeline = Pipeline::new(config(signals, false)).unwrap();
    let window = pipeline.window();

    // temperature present, rain absent: the rain build fails and the
    // location is skipped under the default policy
    let inputs = [LocationInput::new(Location::new("p1", 0.0, 0.0, 0.0))
        .with_samples(Signal::Temperature, temp_samples(window, 24.0))];

    let output = pipeline.run(&inputs).unwrap();
    assert_eq!(output.summary.processed, 0);
    assert_eq!(output.summary.skipped, 1);
    assert!(output.records.is_empty());
}

#[test]
fn sparse_samples_still_cover_every_day() {
    let pipeline = Pipeline::new(config(temperature_only(), false)).unwrap();
    let window = pipeline.window();

    // keep only every seventh day's observation
    let sparse: Vec<RawSample> = temp_samples(window, 21.0)
        .into_iter()
        .step_by(7)
        .collect();
    let inputs = [LocationInput::new(Location::new("p1", 0.0, 0.0, 0.0))
        .with_samples(Signal::Temperature, sparse)];

    let output = pipeline.run(&inputs).unwrap();
    assert_eq!(output.records.len(), window.num_days());
    for record in &output.records {
        // constant input interpolates to the same constant
        let t = record.values[&Signal::Temperature];
        assert!((t - 21.0).abs() < 1e-9);
    }
}
