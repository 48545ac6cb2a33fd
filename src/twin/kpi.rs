//! Post-hoc recovery KPIs from a finished run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::graph::TwinGraph;
use super::types::StepResult;
use super::vulnerability::VulnerabilityGroup;

/// Outage statistics for one vulnerability group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupOutage {
    /// Buildings in the group.
    pub buildings: usize,
    /// Mean outage duration over those buildings (days).
    pub mean_outage_days: f64,
    /// Longest outage among those buildings (days).
    pub max_outage_days: f64,
}

/// Aggregate recovery indicators for a complete run.
///
/// Outage figures come from the final graph state; restoration timing
/// comes from the step records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryReport {
    /// Name of the policy that produced the run.
    pub policy: String,
    /// Number of buildings in the twin.
    pub buildings: usize,
    /// Percentage of buildings with power at the end of the run.
    pub energized_pct: f64,
    /// Sum of outage days over all buildings.
    pub total_outage_days: f64,
    /// Mean outage per building (days).
    pub mean_outage_days: f64,
    /// Longest single-building outage (days).
    pub max_outage_days: f64,
    /// Elapsed days at the first step where every building had power.
    pub restoration_day: Option<f64>,
    /// Per-group outage breakdown; only groups present in the twin appear.
    pub by_group: BTreeMap<VulnerabilityGroup, GroupOutage>,
}

impl RecoveryReport {
    /// Computes all KPIs from the final graph and the step record vector.
    pub fn from_run(policy: &str, graph: &TwinGraph, results: &[StepResult]) -> Self {
        let mut total = 0.0_f64;
        let mut max = 0.0_f64;
        let mut count = 0_usize;
        let mut energized = 0_usize;
        let mut groups: BTreeMap<VulnerabilityGroup, (usize, f64, f64)> = BTreeMap::new();

        for b in graph.buildings() {
            let d = b.outage_duration_days();
            count += 1;
            total += d;
            max = max.max(d);
            if b.is_energized() {
                energized += 1;
            }
            let g = groups.entry(b.vulnerability_group()).or_insert((0, 0.0, 0.0));
            g.0 += 1;
            g.1 += d;
            g.2 = g.2.max(d);
        }

        let by_group = groups
            .into_iter()
            .map(|(group, (n, sum, longest))| {
                (
                    group,
                    GroupOutage {
                        buildings: n,
                        mean_outage_days: sum / n as f64,
                        max_outage_days: longest,
                    },
                )
            })
            .collect();

        let restoration_day = results
            .iter()
            .find(|r| r.energized_buildings == r.total_buildings)
            .map(|r| r.time_days);

        let (energized_pct, mean) = if count > 0 {
            (100.0 * energized as f64 / count as f64, total / count as f64)
        } else {
            (100.0, 0.0)
        };

        Self {
            policy: policy.to_string(),
            buildings: count,
            energized_pct,
            total_outage_days: total,
            mean_outage_days: mean,
            max_outage_days: max,
            restoration_day,
            by_group,
        }
    }
}

impl fmt::Display for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Recovery Report ({}) ---", self.policy)?;
        writeln!(f, "Buildings:             {}", self.buildings)?;
        writeln!(f, "Energized at end:      {:.1}%", self.energized_pct)?;
        writeln!(f, "Total outage:          {:.2} bldg-days", self.total_outage_days)?;
        writeln!(f, "Mean outage:           {:.2} days", self.mean_outage_days)?;
        writeln!(f, "Max outage:            {:.2} days", self.max_outage_days)?;
        match self.restoration_day {
            Some(d) => writeln!(f, "Full restoration:      day {d:.1}")?,
            None => writeln!(f, "Full restoration:      not reached")?,
        }
        write!(f, "Mean outage by group:")?;
        for (group, g) in &self.by_group {
            write!(
                f,
                "\n  {:<12} {:>4} bldgs  mean {:.2} d  max {:.2} d",
                group.as_str(),
                g.buildings,
                g.mean_outage_days,
                g.max_outage_days
            )?;
        }
        Ok(())
    }
}
