//! API response and query types.
//!
//! Telemetry field names follow the CSV schema v1 columns.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::twin::graph::{BuildingNode, NodeId, TwinGraph};
use crate::twin::kpi::RecoveryReport;
use crate::twin::types::StepResult;
use crate::twin::vulnerability::VulnerabilityGroup;

/// Combined state response: config, report, and latest telemetry record.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub config: ScenarioConfig,
    pub report: RecoveryReport,
    /// Most recent step, or `null` when the run had no steps.
    pub latest_step: Option<TelemetryRecord>,
}

/// Single telemetry record using CSV schema v1 field names.
#[derive(Debug, Serialize)]
pub struct TelemetryRecord {
    pub step: usize,
    pub time_days: f64,
    pub repaired: Vec<NodeId>,
    pub energized_buildings: usize,
    pub total_buildings: usize,
    /// Share of buildings with power (0 to 100).
    pub energized_pct: f64,
    pub operational_assets: usize,
    pub total_assets: usize,
    pub customer_outage_days: f64,
}

impl From<&StepResult> for TelemetryRecord {
    fn from(r: &StepResult) -> Self {
        Self {
            step: r.step,
            time_days: r.time_days,
            repaired: r.repaired.clone(),
            energized_buildings: r.energized_buildings,
            total_buildings: r.total_buildings,
            energized_pct: r.energized_fraction() * 100.0,
            operational_assets: r.operational_assets,
            total_assets: r.total_assets,
            customer_outage_days: r.customer_outage_days,
        }
    }
}

/// Final state of one building plus the feeder that serves it.
#[derive(Debug, Clone, Serialize)]
pub struct BuildingView {
    pub id: NodeId,
    pub event: String,
    pub damage_state: String,
    pub vulnerability_group: VulnerabilityGroup,
    pub lat: f64,
    pub lon: f64,
    pub feeder: Option<NodeId>,
    pub is_energized: bool,
    pub outage_duration_days: f64,
}

impl BuildingView {
    pub fn from_node(graph: &TwinGraph, b: &BuildingNode) -> Self {
        let loc = b.location();
        Self {
            id: b.id().to_string(),
            event: b.event().to_string(),
            damage_state: b.damage_state().to_string(),
            vulnerability_group: b.vulnerability_group(),
            lat: loc.lat,
            lon: loc.lon,
            feeder: graph.feeders_of(b.id()).next().map(|f| f.id().to_string()),
            is_energized: b.is_energized(),
            outage_duration_days: b.outage_duration_days(),
        }
    }
}

/// Optional range query parameters for the telemetry endpoint.
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    /// Start step (inclusive).
    pub from: Option<usize>,
    /// End step (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
