//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use hazard_twin::data::BuildingRecord;
use hazard_twin::twin::state::DigitalTwin;
use hazard_twin::twin::types::SimConfig;

/// Default simulation configuration (one-day steps, 30 steps).
pub fn default_config() -> SimConfig {
    SimConfig::new(1.0, 30)
}

/// Two buildings near Panama City and one near Fort Myers.
pub fn three_buildings() -> Vec<BuildingRecord> {
    vec![
        BuildingRecord::new("B1", 29.0, -85.0),
        BuildingRecord::new("B2", 29.1, -85.1),
        BuildingRecord::new("B3", 26.0, -82.0),
    ]
}

/// A commercial pair in the north and a hospital plus a home in the south.
pub fn split_neighborhood() -> Vec<BuildingRecord> {
    vec![
        BuildingRecord::new("N1", 29.00, -85.00).with_occupancy("commercial"),
        BuildingRecord::new("N2", 29.01, -85.01).with_occupancy("commercial"),
        BuildingRecord::new("S1", 26.00, -82.00).with_occupancy("hospital"),
        BuildingRecord::new("S2", 26.01, -82.01).with_occupancy("residential"),
    ]
}

/// Twin over `records` with `feeders` requested feeders.
pub fn twin_of(records: &[BuildingRecord], feeders: usize) -> DigitalTwin {
    DigitalTwin::from_records(records, feeders)
}
