//! CSV export for recovery step results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::twin::types::StepResult;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "step,time_days,repaired,energized_buildings,total_buildings,\
                      energized_pct,operational_assets,total_assets,customer_outage_days";

/// Separator between ids in the `repaired` column.
const REPAIRED_SEP: &str = ";";

/// Exports step results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step using the schema v1
/// column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes step results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.step.to_string(),
            format!("{:.3}", r.time_days),
            r.repaired.join(REPAIRED_SEP),
            r.energized_buildings.to_string(),
            r.total_buildings.to_string(),
            format!("{:.2}", r.energized_fraction() * 100.0),
            r.operational_assets.to_string(),
            r.total_assets.to_string(),
            format!("{:.3}", r.customer_outage_days),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_step(t: usize) -> StepResult {
        StepResult {
            step: t,
            time_days: (t + 1) as f64,
            repaired: vec![format!("feeder:{t}")],
            energized_buildings: t,
            total_buildings: 10,
            operational_assets: t + 1,
            total_assets: 11,
            customer_outage_days: 10.0 - t as f64,
        }
    }

    fn render(results: &[StepResult]) -> String {
        let mut buf = Vec::new();
        write_csv(results, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_matches_schema_v1() {
        let output = render(&[make_step(0)]);
        let first_line = output.lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "step,time_days,repaired,energized_buildings,total_buildings,\
             energized_pct,operational_assets,total_assets,customer_outage_days"
        );
    }

    #[test]
    fn row_count_matches_step_count() {
        let results: Vec<StepResult> = (0..7).map(make_step).collect();
        // 1 header + 7 data rows
        assert_eq!(render(&results).lines().count(), 8);
    }

    #[test]
    fn empty_and_multi_repairs() {
        let mut quiet = make_step(0);
        quiet.repaired.clear();
        let mut busy = make_step(1);
        busy.repaired.push("feeder:9".to_string());

        let output = render(&[quiet, busy]);
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().filter_map(|r| r.ok()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(2), Some(""));
        assert_eq!(rows[1].get(2), Some("feeder:1;feeder:9"));
    }

    #[test]
    fn numeric_columns_parse() {
        let results: Vec<StepResult> = (0..3).map(make_step).collect();
        let output = render(&results);
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let Some(rec) = rec else { continue };
            for i in [1, 5, 8] {
                let val: Result<f64, _> = rec[i].parse();
                assert!(val.is_ok(), "column {i} should parse as f64");
            }
        }
    }

    #[test]
    fn deterministic_output() {
        let results: Vec<StepResult> = (0..5).map(make_step).collect();
        assert_eq!(render(&results), render(&results));
    }
}
