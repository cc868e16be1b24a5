//! Persistence boundary: tabular artifacts for the writing collaborator.
//!
//! Two artifacts leave the core: the per-location per-day joined audit table
//! (kept for reuse in later runs) and the per-location risk table carrying
//! the location geometry as WKT points, ready for geospatial write-out.

use std::io::{self, Write};

use rustc_hash::FxHashMap;

use crate::config::SignalSelection;
use crate::core_types::{Location, Signal};
use crate::risk::RiskRecord;
use crate::series::AlignedRecord;

/// Audit file name for a run, e.g. `datos2020_LST_Chirps_.csv`.
#[must_use]
pub fn audit_file_name(year: i32, signals: &SignalSelection) -> String {
    let mut name = format!("datos{year}_");
    for signal in signals.active() {
        name.push_str(signal.info().file_tag);
    }
    name.push_str(".csv");
    name
}

/// Write the joined daily table: one row per location per day, with one
/// column per requested signal (named by its source band). Days where an
/// optional signal is absent leave that column empty.
pub fn write_audit_csv<W: Write>(
    writer: &mut W,
    key_field: &str,
    signals: &[Signal],
    records: &[AlignedRecord],
) -> io::Result<()> {
    write!(writer, "{key_field},date,x,y")?;
    for signal in signals {
        write!(writer, ",{}", signal.band())?;
    }
    writeln!(writer)?;

    for record in records {
        write!(
            writer,
            "{},{},{},{}",
            record.key, record.date, record.x, record.y
        )?;
        for signal in signals {
            match record.values.get(signal) {
                Some(value) => write!(writer, ",{value}")?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write one row per location: cycle counts, susceptibility, risk score and
/// the original point geometry as WKT. Rows are sorted by key so repeated
/// runs produce identical files.
pub fn write_risk_csv<W: Write>(
    writer: &mut W,
    key_field: &str,
    susceptibility_field: &str,
    locations: &FxHashMap<String, Location>,
    risk: &FxHashMap<String, RiskRecord>,
) -> io::Result<()> {
    writeln!(
        writer,
        "{key_field},ciclos,ciclos_norm,{susceptibility_field},Riesgo_Amb,geometry"
    )?;

    let mut keys: Vec<&String> = risk.keys().collect();
    keys.sort_unstable();
    for key in keys {
        let record = &risk[key];
        let Some(location) = locations.get(key) else {
            continue;
        };
        writeln!(
            writer,
            "{},{},{},{},{},POINT ({} {})",
            record.key,
            record.cycles,
            record.cycles_norm,
            record.susceptibility,
            record.score,
            location.coords.x,
            location.coords.y
        )?;
    }
    Ok(())
}
