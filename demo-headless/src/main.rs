use std::error::Error;
use std::f64::consts::TAU;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use rustc_hash::FxHashMap;
use tracing_subscriber::EnvFilter;

use vector_risk_core::export::{audit_file_name, write_audit_csv, write_risk_csv};
use vector_risk_core::series::JoinPolicy;
use vector_risk_core::{
    Location, LocationInput, Pipeline, RawSample, RunConfig, Signal, SignalSelection,
};

/// Environmental risk pipeline demo over synthetic satellite samples
#[derive(Parser, Debug)]
#[command(name = "vector-risk-demo")]
#[command(about = "Reproductive-cycle risk demo with synthetic inputs", long_about = None)]
struct Args {
    /// Target year (the run window spans into the following year)
    #[arg(short, long, default_value_t = 2020)]
    year: i32,

    /// Number of synthetic locations
    #[arg(short, long, default_value_t = 25)]
    locations: usize,

    /// Also generate and join daily precipitation
    #[arg(long)]
    rain_daily: bool,

    /// Also generate and join sub-daily precipitation
    #[arg(long)]
    rain_sub_daily: bool,

    /// Skip the cycle/risk computation and only emit the joined table
    #[arg(long)]
    no_risk: bool,

    /// Keep days where an optional signal is missing instead of dropping them
    #[arg(long)]
    keep_partial: bool,

    /// Join-key column name in the output tables
    #[arg(long, default_value = "id")]
    key_field: String,

    /// Susceptibility column name in the risk table
    #[arg(long, default_value = "Mapa_pr")]
    susceptibility_field: String,

    /// Output directory for the CSV artifacts
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
}

fn timestamp_ms(date: NaiveDate, hour: u32) -> i64 {
    date.and_hms_opt(hour, 0, 0)
        .expect("valid hour")
        .and_utc()
        .timestamp_millis()
}

/// Raw scaled-Kelvin value for a Celsius temperature.
fn lst_raw(celsius: f64) -> f64 {
    (celsius + 273.15) / 0.02
}

/// Synthetic land-surface temperature: a yearly sinusoid whose mean rises
/// with the location index, with roughly one day in nine dropped so the
/// gap-filling interpolation has work to do.
fn temperature_samples(
    days: &[NaiveDate],
    location_index: usize,
    location_count: usize,
) -> Vec<RawSample> {
    let spread = location_index as f64 / location_count.max(1) as f64;
    let mean = 12.0 + 12.0 * spread;
    days.iter()
        .enumerate()
        .filter(|(day, _)| (day + location_index) % 9 != 0)
        .map(|(day, &date)| {
            let celsius = mean + 9.0 * (TAU * day as f64 / 365.0).sin();
            RawSample::new(timestamp_ms(date, 12), lst_raw(celsius))
        })
        .collect()
}

/// Synthetic daily precipitation, in phase opposition to the temperature.
fn rain_daily_samples(days: &[NaiveDate], location_index: usize) -> Vec<RawSample> {
    days.iter()
        .enumerate()
        .map(|(day, &date)| {
            let phase = TAU * (day + 30 * location_index) as f64 / 365.0;
            let mm = (3.0 - 4.0 * phase.sin()).max(0.0);
            RawSample::new(timestamp_ms(date, 12), mm)
        })
        .collect()
}

/// Synthetic sub-daily precipitation: two half-day observations per day that
/// the pipeline sums back into a daily total.
fn rain_sub_daily_samples(days: &[NaiveDate], location_index: usize) -> Vec<RawSample> {
    days.iter()
        .enumerate()
        .flat_map(|(day, &date)| {
            let phase = TAU * (day + 45 * location_index) as f64 / 365.0;
            let total = (2.5 - 3.0 * phase.cos()).max(0.0);
            [
                RawSample::new(timestamp_ms(date, 6), 0.4 * total),
                RawSample::new(timestamp_ms(date, 18), 0.6 * total),
            ]
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let signals = SignalSelection {
        temperature: true,
        rain_daily: args.rain_daily,
        rain_sub_daily: args.rain_sub_daily,
    };
    let config = RunConfig {
        year: args.year,
        signals,
        key_field: args.key_field.clone(),
        susceptibility_field: args.susceptibility_field.clone(),
        compute_risk: !args.no_risk,
        join_policy: if args.keep_partial {
            JoinPolicy::KeepPartial
        } else {
            JoinPolicy::DropIncomplete
        },
    };

    let pipeline = Pipeline::new(config)?;
    let window = pipeline.window();
    let days: Vec<NaiveDate> = window.days().collect();

    println!("=== Environmental Risk Demo ===\n");
    println!(
        "Window: {} .. {} ({} days), {} locations",
        window.start(),
        window.end(),
        window.num_days(),
        args.locations
    );

    let denominator = args.locations.saturating_sub(1).max(1) as f64;
    let inputs: Vec<LocationInput> = (0..args.locations)
        .map(|i| {
            let susceptibility = 0.2 + 0.8 * (i as f64 / denominator);
            let location = Location::new(
                format!("p{i:03}"),
                -60.0 + 0.25 * i as f64,
                -34.0 - 0.1 * i as f64,
                susceptibility,
            );
            let mut input = LocationInput::new(location).with_samples(
                Signal::Temperature,
                temperature_samples(&days, i, args.locations),
            );
            if signals.rain_daily {
                input = input.with_samples(Signal::RainDaily, rain_daily_samples(&days, i));
            }
            if signals.rain_sub_daily {
                input =
                    input.with_samples(Signal::RainSubDaily, rain_sub_daily_samples(&days, i));
            }
            input
        })
        .collect();

    let output = pipeline.run(&inputs)?;

    println!(
        "\nProcessed {} location(s), skipped {}, {} joined rows",
        output.summary.processed,
        output.summary.skipped,
        output.records.len()
    );

    fs::create_dir_all(&args.out_dir)?;

    let audit_path = args.out_dir.join(audit_file_name(args.year, &signals));
    let mut audit = BufWriter::new(File::create(&audit_path)?);
    write_audit_csv(
        &mut audit,
        &args.key_field,
        &signals.active(),
        &output.records,
    )?;
    println!("Wrote {}", audit_path.display());

    if let Some(risk) = &output.risk {
        let locations: FxHashMap<String, Location> = inputs
            .iter()
            .map(|input| (input.location.key.clone(), input.location.clone()))
            .collect();

        let risk_path = args.out_dir.join(format!("riesgo{}.csv", args.year));
        let mut writer = BufWriter::new(File::create(&risk_path)?);
        write_risk_csv(
            &mut writer,
            &args.key_field,
            &args.susceptibility_field,
            &locations,
            risk,
        )?;
        println!("Wrote {}", risk_path.display());

        let mut keys: Vec<&String> = risk.keys().collect();
        keys.sort_unstable();
        println!("\n{:<6} {:>7} {:>12} {:>10}", "key", "cycles", "cycles_norm", "risk");
        for key in keys {
            let record = &risk[key];
            println!(
                "{:<6} {:>7} {:>12.4} {:>10.4}",
                record.key, record.cycles, record.cycles_norm, record.score
            );
        }
    }

    Ok(())
}
