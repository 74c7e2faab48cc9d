//! CSV export for simulation snapshots.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::DispatchSnapshot;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "timestep,time_hr,load_w,sc_w,batt_w,v_sc,v_batt,\
                       i_sc,i_batt,soc_batt,soh_batt,transient";

/// Exports simulation snapshots to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step using the schema v1
/// column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[DispatchSnapshot], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes simulation snapshots as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[DispatchSnapshot], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in results {
        wtr.write_record(&[
            r.timestep.to_string(),
            format!("{:.4}", r.time_hr),
            format!("{:.4}", r.load_w),
            format!("{:.4}", r.sc_w),
            format!("{:.4}", r.batt_w),
            format!("{:.4}", r.v_sc),
            format!("{:.4}", r.v_batt),
            format!("{:.4}", r.i_sc),
            format!("{:.4}", r.i_batt),
            format!("{:.6}", r.soc_batt),
            format!("{:.6}", r.soh_batt),
            r.transient.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
