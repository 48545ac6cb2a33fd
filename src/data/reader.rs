use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Error, Result};

use super::table::BuildingTable;

/// Reads a building table from CSV.
///
/// The first row is the header. Cells are trimmed and empty cells become
/// missing values. Column contracts are not checked here; that happens
/// when the table is turned into records.
///
/// # Errors
///
/// Returns [`Error::Csv`] if the input is not well-formed CSV.
pub fn read_building_table(reader: impl Read) -> Result<BuildingTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut table = BuildingTable::new(rdr.headers()?.iter());
    for record in rdr.records() {
        let record = record?;
        table.push_row(record.iter().map(Some));
    }
    Ok(table)
}

/// Opens `path` and reads it with [`read_building_table`].
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, otherwise whatever
/// [`read_building_table`] returns.
pub fn read_building_table_from_path(path: &Path) -> Result<BuildingTable> {
    let file = File::open(path).map_err(|e| {
        Error::Io(io::Error::new(
            e.kind(),
            format!("building data not found at \"{}\": {e}", path.display()),
        ))
    })?;
    read_building_table(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_canonical_columns() {
        let csv = "id,lat,lon,event,damage_state\n\
                   M1,29.94,-85.41,Michael,moderate\n\
                   M2,29.95,-85.40,Michael,\n";
        let table = read_building_table(csv.as_bytes()).expect("csv should parse");
        assert_eq!(table.len(), 2);

        let records = table.records().expect("contract should hold");
        assert_eq!(records[0].id, "M1");
        assert_eq!(records[0].damage_state.as_deref(), Some("moderate"));
        assert_eq!(records[1].damage_state, None);
        assert_eq!(records[1].lon, -85.40);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "id,lat,lon,wind_speed_ms\nB1,29.0,-85.0,52.0\n";
        let table = read_building_table(csv.as_bytes()).expect("csv should parse");
        let records = table.records().expect("contract should hold");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn headers_without_coordinates_fail_at_record_conversion() {
        let csv = "id,latitude,longitude\nB1,29.0,-85.0\n";
        let table = read_building_table(csv.as_bytes()).expect("csv should parse");
        assert!(matches!(table.records(), Err(Error::DataContract(_))));
    }

    #[test]
    fn ragged_rows_are_a_csv_error() {
        let csv = "id,lat,lon\nB1,29.0\n";
        assert!(matches!(
            read_building_table(csv.as_bytes()),
            Err(Error::Csv(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_building_table_from_path(Path::new("/nonexistent/michael.csv")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
