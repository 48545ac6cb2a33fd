//! Digital twin of the grid serving a set of damaged buildings.

/// Fixed-seed k-means used to place feeders.
pub mod cluster;
/// Network builder: substation, feeders, buildings.
pub mod builder;
/// Simulation clock counting elapsed days.
pub mod clock;
pub mod engine;
/// Arena graph of building and grid-asset nodes.
pub mod graph;
pub mod kpi;
/// Repair-selection policies.
pub mod policy;
pub mod propagation;
pub mod state;
pub mod types;
/// Occupancy-to-vulnerability classification.
pub mod vulnerability;

pub use builder::{DEFAULT_FEEDER_COUNT, build_graph};
pub use engine::Engine;
pub use graph::{NodeId, TwinGraph};
pub use kpi::RecoveryReport;
pub use policy::{BaselinePolicy, EquityPolicy, PolicyKind, RecoveryPolicy};
pub use state::DigitalTwin;
pub use types::{SimConfig, StepResult};
pub use vulnerability::VulnerabilityGroup;
