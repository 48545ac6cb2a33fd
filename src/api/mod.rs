//! REST API for a finished recovery run.
//!
//! Provides three GET endpoints:
//! - `/state`: scenario config, recovery report, and latest step
//! - `/telemetry`: step results with optional range filtering
//! - `/buildings`: final per-building state

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::ScenarioConfig;
use crate::twin::kpi::RecoveryReport;
use crate::twin::state::DigitalTwin;
use crate::twin::types::StepResult;

pub use types::{BuildingView, ErrorResponse, StateResponse, TelemetryQuery, TelemetryRecord};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the run completes and wrapped in `Arc`.
/// All data is read-only, so no locks are needed.
pub struct AppState {
    /// Scenario used for this run.
    pub config: ScenarioConfig,
    /// Aggregate recovery report.
    pub report: RecoveryReport,
    /// Per-step results.
    pub results: Vec<StepResult>,
    /// Final building state, ordered by id.
    pub buildings: Vec<BuildingView>,
}

impl AppState {
    /// Captures everything the API serves from a finished run.
    pub fn from_run(
        config: ScenarioConfig,
        twin: &DigitalTwin,
        report: RecoveryReport,
        results: Vec<StepResult>,
    ) -> Self {
        let graph = twin.graph();
        let buildings = graph
            .buildings()
            .map(|b| BuildingView::from_node(graph, b))
            .collect();
        Self {
            config,
            report,
            results,
            buildings,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/telemetry", get(handlers::get_telemetry))
        .route("/buildings", get(handlers::get_buildings))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
