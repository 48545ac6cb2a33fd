//! Simulation engine driving a twin with a fixed policy and step size.

use super::policy::RecoveryPolicy;
use super::state::DigitalTwin;
use super::types::{SimConfig, StepResult};

/// Owns a twin, the policy that repairs it, and the run configuration.
///
/// Generic over `P: RecoveryPolicy` for static dispatch.
pub struct Engine<P: RecoveryPolicy> {
    config: SimConfig,
    twin: DigitalTwin,
    policy: P,
}

impl<P: RecoveryPolicy> Engine<P> {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Step size and step budget
    /// * `twin` - Freshly built twin (or one mid-recovery)
    /// * `policy` - Repair-selection policy
    pub fn new(config: SimConfig, twin: DigitalTwin, policy: P) -> Self {
        Self {
            config,
            twin,
            policy,
        }
    }

    /// Executes one simulation step and returns its record.
    pub fn step(&mut self) -> StepResult {
        self.twin.step(&self.policy, self.config.dt_days)
    }

    /// Executes all `max_steps` steps and returns the complete record vector.
    pub fn run(&mut self) -> Vec<StepResult> {
        let total = self.config.max_steps;
        let mut results = Vec::with_capacity(total);
        for _ in 0..total {
            results.push(self.step());
        }
        self.log_summary(&results);
        results
    }

    /// Steps until the twin is fully restored or `max_steps` is reached.
    ///
    /// The step that completes restoration is included in the results.
    pub fn run_until_restored(&mut self) -> Vec<StepResult> {
        let mut results = Vec::new();
        while results.len() < self.config.max_steps {
            let r = self.step();
            let done = r.fully_restored();
            results.push(r);
            if done {
                break;
            }
        }
        self.log_summary(&results);
        results
    }

    fn log_summary(&self, results: &[StepResult]) {
        if let Some(last) = results.last() {
            tracing::info!(
                policy = self.policy.name(),
                steps = results.len(),
                t_days = last.time_days,
                energized = last.energized_buildings,
                buildings = last.total_buildings,
                restored = last.fully_restored(),
                "run finished"
            );
        }
    }

    /// Returns a reference to the twin.
    pub fn twin(&self) -> &DigitalTwin {
        &self.twin
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Consumes the engine and hands back the twin.
    pub fn into_twin(self) -> DigitalTwin {
        self.twin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BuildingRecord;
    use crate::twin::policy::{BaselinePolicy, EquityPolicy};

    fn four_buildings() -> DigitalTwin {
        let records = vec![
            BuildingRecord::new("N1", 29.00, -85.00).with_occupancy("commercial"),
            BuildingRecord::new("N2", 29.01, -85.01).with_occupancy("commercial"),
            BuildingRecord::new("S1", 26.00, -82.00).with_occupancy("hospital"),
            BuildingRecord::new("S2", 26.01, -82.01).with_occupancy("residential"),
        ];
        DigitalTwin::from_records(&records, 2)
    }

    #[test]
    fn run_produces_max_steps_records() {
        let mut engine = Engine::new(SimConfig::new(1.0, 5), four_buildings(), BaselinePolicy);
        let results = engine.run();
        assert_eq!(results.len(), 5);
        assert_eq!(results[4].time_days, 5.0);
        assert!(engine.twin().is_fully_restored());
    }

    #[test]
    fn run_until_restored_stops_early() {
        let mut engine = Engine::new(SimConfig::new(1.0, 50), four_buildings(), BaselinePolicy);
        let results = engine.run_until_restored();
        // substation + two feeders, one per step
        assert_eq!(results.len(), 3);
        assert!(results[2].fully_restored());
    }

    #[test]
    fn run_until_restored_respects_budget() {
        let mut engine = Engine::new(SimConfig::new(1.0, 2), four_buildings(), BaselinePolicy);
        let results = engine.run_until_restored();
        assert_eq!(results.len(), 2);
        assert!(!engine.twin().is_fully_restored());
    }

    #[test]
    fn equity_serves_vulnerable_cluster_first() {
        let mut engine = Engine::new(
            SimConfig::new(1.0, 3),
            four_buildings(),
            EquityPolicy::default(),
        );
        engine.step();
        engine.step();
        let twin = engine.twin();
        assert!(twin.graph().building("S1").is_some_and(|b| b.is_energized()));
        assert!(twin.graph().building("N1").is_some_and(|b| !b.is_energized()));
    }
}
