//! Core simulation types: run configuration and per-step records.

use std::fmt;

use serde::Serialize;

use super::graph::NodeId;

/// Run-level simulation parameters shared by the engine and reports.
///
/// # Examples
///
/// ```
/// use hazard_twin::twin::types::SimConfig;
///
/// let cfg = SimConfig::new(1.0, 30);
/// assert_eq!(cfg.horizon_days(), 30.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimConfig {
    /// Length of one step in days.
    pub dt_days: f64,
    /// Maximum number of steps to run.
    pub max_steps: usize,
}

impl SimConfig {
    /// Creates a new simulation configuration.
    ///
    /// # Panics
    ///
    /// Panics if `dt_days` is not a positive finite number.
    pub fn new(dt_days: f64, max_steps: usize) -> Self {
        assert!(
            dt_days.is_finite() && dt_days > 0.0,
            "dt_days must be a positive finite number"
        );
        Self { dt_days, max_steps }
    }

    /// Simulated days covered when all `max_steps` run.
    pub fn horizon_days(&self) -> f64 {
        self.dt_days * self.max_steps as f64
    }
}

/// Record of one simulation step, taken after repairs and propagation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    /// Step index, starting at 0.
    pub step: usize,
    /// Elapsed days at the end of the step.
    pub time_days: f64,
    /// Grid assets that became operational during the step.
    pub repaired: Vec<NodeId>,
    /// Buildings with power after the step.
    pub energized_buildings: usize,
    /// Total buildings in the twin.
    pub total_buildings: usize,
    /// Operational grid assets after the step.
    pub operational_assets: usize,
    /// Total grid assets in the twin.
    pub total_assets: usize,
    /// Sum of outage days over all buildings after the step.
    pub customer_outage_days: f64,
}

impl StepResult {
    /// Share of buildings with power, in `[0, 1]`. An empty twin counts as fully served.
    pub fn energized_fraction(&self) -> f64 {
        if self.total_buildings == 0 {
            1.0
        } else {
            self.energized_buildings as f64 / self.total_buildings as f64
        }
    }

    /// `true` once every asset is repaired and every building has power.
    pub fn fully_restored(&self) -> bool {
        self.operational_assets == self.total_assets
            && self.energized_buildings == self.total_buildings
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repaired = if self.repaired.is_empty() {
            "-".to_string()
        } else {
            self.repaired.join(",")
        };
        write!(
            f,
            "step={:>3} ({:>6.1} d) | repaired={:<14} | assets {}/{} | \
             energized {}/{} ({:>5.1}%) | outage={:.1} bldg-days",
            self.step,
            self.time_days,
            repaired,
            self.operational_assets,
            self.total_assets,
            self.energized_buildings,
            self.total_buildings,
            self.energized_fraction() * 100.0,
            self.customer_outage_days,
        )
    }
}
