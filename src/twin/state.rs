//! The digital twin: graph plus simulation clock, and the step driver.

use crate::data::{BuildingRecord, BuildingTable};
use crate::error::Result;

use super::builder::build_graph;
use super::clock::SimClock;
use super::graph::{NodeId, TwinGraph};
use super::policy::RecoveryPolicy;
use super::propagation::propagate_power;
use super::types::StepResult;

/// Current infrastructure and building state plus elapsed time.
///
/// The node set and edges are fixed at construction; stepping only
/// changes operational flags, energized flags, outage totals and the clock.
#[derive(Debug, Clone)]
pub struct DigitalTwin {
    graph: TwinGraph,
    clock: SimClock,
}

impl DigitalTwin {
    /// Builds a twin from a building table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataContract`](crate::Error::DataContract) if the
    /// table lacks the `lat`/`lon` columns or holds unparseable coordinates.
    pub fn from_table(table: &BuildingTable, feeder_count: usize) -> Result<Self> {
        let records = table.records()?;
        Ok(Self::from_records(&records, feeder_count))
    }

    /// Builds a twin from already-validated records.
    pub fn from_records(records: &[BuildingRecord], feeder_count: usize) -> Self {
        Self {
            graph: build_graph(records, feeder_count),
            clock: SimClock::new(),
        }
    }

    /// Read access to the graph.
    pub fn graph(&self) -> &TwinGraph {
        &self.graph
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Elapsed simulation time in days.
    pub fn elapsed_days(&self) -> f64 {
        self.clock.elapsed_days()
    }

    /// Marks a grid asset operational outside of a policy step.
    ///
    /// Energized flags are not updated until the next propagation.
    /// Returns `false` if `id` is not a grid asset.
    pub fn repair(&mut self, id: &str) -> bool {
        self.graph.mark_operational(id)
    }

    /// Recomputes energized flags. Returns the number of energized buildings.
    pub fn propagate(&mut self) -> usize {
        propagate_power(&mut self.graph)
    }

    /// Advances the twin by one step.
    ///
    /// 1. Ask `policy` which assets to repair.
    /// 2. Mark those grid assets operational (anything else is skipped).
    /// 3. Recompute energized flags.
    /// 4. Add `dt_days` of outage to every building still dark.
    /// 5. Advance the clock.
    ///
    /// There is no failure path once a step begins.
    pub fn step<P: RecoveryPolicy + ?Sized>(&mut self, policy: &P, dt_days: f64) -> StepResult {
        let t = self.clock.elapsed_days();
        let selected = policy.select_repairs(&self.graph, t);

        let mut repaired: Vec<NodeId> = Vec::with_capacity(selected.len());
        for id in selected {
            if self.graph.mark_operational(&id) {
                repaired.push(id);
            } else {
                tracing::warn!(node = %id, policy = policy.name(), "ignoring repair of non-grid node");
            }
        }

        let energized = self.propagate();
        for b in self.graph.buildings_mut() {
            b.accumulate_outage(dt_days);
        }
        let step = self.clock.advance(dt_days);

        let result = self.snapshot(step, repaired, energized);
        tracing::debug!(
            step,
            t_days = result.time_days,
            repaired = ?result.repaired,
            energized,
            "step complete"
        );
        result
    }

    /// `true` when every grid asset is operational and every building has power.
    pub fn is_fully_restored(&self) -> bool {
        self.graph.damaged_assets().next().is_none()
            && self.graph.buildings().all(|b| b.is_energized())
    }

    fn snapshot(&self, step: usize, repaired: Vec<NodeId>, energized: usize) -> StepResult {
        StepResult {
            step,
            time_days: self.clock.elapsed_days(),
            repaired,
            energized_buildings: energized,
            total_buildings: self.graph.buildings().count(),
            operational_assets: self
                .graph
                .grid_assets()
                .filter(|a| a.is_operational())
                .count(),
            total_assets: self.graph.grid_assets().count(),
            customer_outage_days: self
                .graph
                .buildings()
                .map(|b| b.outage_duration_days())
                .sum(),
        }
    }
}
