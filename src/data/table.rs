use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::twin::graph::is_grid_asset_id;

/// Column holding the building identifier.
pub const ID_COLUMN: &str = "id";
/// Column holding latitude.
pub const LAT_COLUMN: &str = "lat";
/// Column holding longitude.
pub const LON_COLUMN: &str = "lon";
/// Optional column naming the hazard event.
pub const EVENT_COLUMN: &str = "event";
/// Optional column with the observed damage state label.
pub const DAMAGE_STATE_COLUMN: &str = "damage_state";
/// Optional column with the free-text occupancy label.
pub const OCCUPANCY_COLUMN: &str = "occupancy";

/// One building row after column lookup and coordinate parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Unique building identifier.
    pub id: String,
    /// Latitude (degrees).
    pub lat: f64,
    /// Longitude (degrees).
    pub lon: f64,
    /// Hazard event name, if the table carries one.
    pub event: Option<String>,
    /// Damage state label, if the table carries one.
    pub damage_state: Option<String>,
    /// Occupancy label, if the table carries one.
    pub occupancy: Option<String>,
}

impl BuildingRecord {
    /// Creates a record with only the required fields set.
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            event: None,
            damage_state: None,
            occupancy: None,
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn with_damage_state(mut self, damage_state: impl Into<String>) -> Self {
        self.damage_state = Some(damage_state.into());
        self
    }

    pub fn with_occupancy(mut self, occupancy: impl Into<String>) -> Self {
        self.occupancy = Some(occupancy.into());
        self
    }
}

/// A column-named table of optional string cells.
///
/// This is the shape the loading side produces. Cells stay untyped until
/// [`BuildingTable::records`] checks the column contract and parses
/// coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl BuildingTable {
    /// Creates an empty table with the given column names.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|h| Into::<String>::into(h).trim().to_string())
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with empty cells, long rows truncated.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut row: Vec<Option<String>> = cells
            .into_iter()
            .map(|c| c.map(Into::<String>::into).filter(|s| !s.trim().is_empty()))
            .collect();
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    /// Builds a canonical table from already-typed records.
    pub fn from_records(records: &[BuildingRecord]) -> Self {
        let mut table = Self::new([
            ID_COLUMN,
            LAT_COLUMN,
            LON_COLUMN,
            EVENT_COLUMN,
            DAMAGE_STATE_COLUMN,
            OCCUPANCY_COLUMN,
        ]);
        for r in records {
            table.push_row([
                Some(r.id.clone()),
                Some(r.lat.to_string()),
                Some(r.lon.to_string()),
                r.event.clone(),
                r.damage_state.clone(),
                r.occupancy.clone(),
            ]);
        }
        table
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Checks the column contract and converts every row into a record.
    ///
    /// `lat` and `lon` are required. When there is no `id` column the
    /// first column is used as the identifier. Missing optional columns
    /// leave the corresponding fields `None` for every row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataContract`] if a coordinate column is absent,
    /// a coordinate cell is empty or not a finite number, or an id cell
    /// is empty or uses a grid-asset id (`substation:0`, `feeder:<n>`).
    pub fn records(&self) -> Result<Vec<BuildingRecord>> {
        let lat_idx = self.column(LAT_COLUMN).ok_or_else(|| {
            Error::data_contract(format!("building table has no `{LAT_COLUMN}` column"))
        })?;
        let lon_idx = self.column(LON_COLUMN).ok_or_else(|| {
            Error::data_contract(format!("building table has no `{LON_COLUMN}` column"))
        })?;
        let id_idx = self.column(ID_COLUMN).unwrap_or(0);
        let event_idx = self.column(EVENT_COLUMN);
        let damage_idx = self.column(DAMAGE_STATE_COLUMN);
        let occupancy_idx = self.column(OCCUPANCY_COLUMN);

        let optional = |row: &[Option<String>], idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row[i].as_ref()).map(|s| s.trim().to_string())
        };

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| -> Result<BuildingRecord> {
                let id = row[id_idx]
                    .as_deref()
                    .map(str::trim)
                    .ok_or_else(|| Error::data_contract(format!("row {i}: empty building id")))?;
                if is_grid_asset_id(id) {
                    return Err(Error::data_contract(format!(
                        "row {i}: building id \"{id}\" is reserved for a grid asset"
                    )));
                }
                Ok(BuildingRecord {
                    id: id.to_string(),
                    lat: parse_coordinate(row[lat_idx].as_deref(), i, LAT_COLUMN)?,
                    lon: parse_coordinate(row[lon_idx].as_deref(), i, LON_COLUMN)?,
                    event: optional(row, event_idx),
                    damage_state: optional(row, damage_idx),
                    occupancy: optional(row, occupancy_idx),
                })
            })
            .collect()
    }
}

fn parse_coordinate(cell: Option<&str>, row: usize, column: &str) -> Result<f64> {
    let raw = cell
        .ok_or_else(|| Error::data_contract(format!("row {row}: empty `{column}` value")))?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::data_contract(format!(
            "row {row}: `{column}` value \"{raw}\" is not a finite number"
        ))),
    }
}
