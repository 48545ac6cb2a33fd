//! Building tables handed to the twin by the data-loading side.
//!
//! The loader that maps raw hazard-event exports onto canonical column
//! names lives outside this crate; what arrives here is a table with
//! `id, lat, lon` and optionally `event, damage_state, occupancy`.

/// Canonical building record and the column-oriented table it is read from.
pub mod table;
/// CSV reader for canonical building tables.
pub mod reader;

pub use reader::{read_building_table, read_building_table_from_path};
pub use table::{BuildingRecord, BuildingTable};

/// A small built-in neighbourhood used when no building file is supplied.
///
/// Two coastal clusters with a mix of occupancies, so both recovery
/// policies have something to disagree about.
pub fn demo_records() -> Vec<BuildingRecord> {
    let rows: [(&str, f64, f64, &str, &str); 12] = [
        ("PC-001", 30.158, -85.660, "RES1 single family", "moderate"),
        ("PC-002", 30.161, -85.655, "RES3 multi family", "severe"),
        ("PC-003", 30.155, -85.662, "COM1 retail", "minor"),
        ("PC-004", 30.163, -85.658, "residential", "destroyed"),
        ("PC-005", 30.157, -85.651, "Hospital", "minor"),
        ("PC-006", 30.160, -85.664, "commercial office", "moderate"),
        ("MB-001", 29.941, -85.410, "residential", "severe"),
        ("MB-002", 29.944, -85.404, "Elementary school", "moderate"),
        ("MB-003", 29.938, -85.407, "COMM warehouse", "minor"),
        ("MB-004", 29.946, -85.412, "RES1", "destroyed"),
        ("MB-005", 29.940, -85.401, "industrial", "moderate"),
        ("MB-006", 29.943, -85.415, "residential", "minor"),
    ];
    rows.iter()
        .map(|&(id, lat, lon, occupancy, damage)| {
            BuildingRecord::new(id, lat, lon)
                .with_event("Michael")
                .with_occupancy(occupancy)
                .with_damage_state(damage)
        })
        .collect()
}
