//! Repair-selection policies.
//!
//! A policy looks at the current graph and elapsed time and names the grid
//! assets to repair this step. The driver applies whatever it returns, so
//! new strategies plug in without touching the step logic.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::graph::{GridAssetNode, NodeId, TwinGraph, feeder_index};
use super::vulnerability::VulnerabilityGroup;

/// Weight applied to buildings whose group has no configured weight.
pub const DEFAULT_GROUP_WEIGHT: f64 = 1.0;

/// Chooses which damaged grid assets to repair at each step.
pub trait RecoveryPolicy {
    /// Returns the ids of grid assets to mark operational.
    ///
    /// # Arguments
    ///
    /// * `graph` - Current twin graph
    /// * `t_days` - Elapsed simulation time in days
    fn select_repairs(&self, graph: &TwinGraph, t_days: f64) -> Vec<NodeId>;

    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;
}

/// Fixed-priority repairs: the substation first, then feeders by id.
///
/// Repairs one asset per step.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaselinePolicy;

impl RecoveryPolicy for BaselinePolicy {
    fn select_repairs(&self, graph: &TwinGraph, _t_days: f64) -> Vec<NodeId> {
        graph
            .damaged_assets()
            .min_by(|a, b| priority_key(a).cmp(&priority_key(b)))
            .map(|a| vec![a.id().to_string()])
            .unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "baseline"
    }
}

fn priority_key(asset: &GridAssetNode) -> (u8, &str) {
    (u8::from(asset.is_feeder()), asset.id())
}

/// Equity-weighted repairs.
///
/// A damaged substation always goes first. Otherwise every damaged feeder
/// is scored by summing the weights of the vulnerability groups of the
/// buildings it serves, and the highest score wins (ties to the lower
/// feeder index).
/// Repairs one asset per step.
#[derive(Debug, Clone)]
pub struct EquityPolicy {
    weights: BTreeMap<VulnerabilityGroup, f64>,
}

impl EquityPolicy {
    /// Creates a policy with explicit weights. Groups missing from
    /// `weights` count as [`DEFAULT_GROUP_WEIGHT`].
    pub fn new(weights: BTreeMap<VulnerabilityGroup, f64>) -> Self {
        Self { weights }
    }

    /// Default weights: residential 1.5, commercial 1.0, critical 2.0,
    /// unknown 1.0.
    pub fn default_weights() -> BTreeMap<VulnerabilityGroup, f64> {
        BTreeMap::from([
            (VulnerabilityGroup::Residential, 1.5),
            (VulnerabilityGroup::Commercial, 1.0),
            (VulnerabilityGroup::Critical, 2.0),
            (VulnerabilityGroup::Unknown, 1.0),
        ])
    }

    pub fn weight(&self, group: VulnerabilityGroup) -> f64 {
        self.weights
            .get(&group)
            .copied()
            .unwrap_or(DEFAULT_GROUP_WEIGHT)
    }

    /// Sum of group weights over the buildings served by `feeder`.
    pub fn feeder_score(&self, graph: &TwinGraph, feeder: &str) -> f64 {
        graph
            .buildings_served_by(feeder)
            .map(|b| self.weight(b.vulnerability_group()))
            .sum()
    }
}

impl Default for EquityPolicy {
    fn default() -> Self {
        Self::new(Self::default_weights())
    }
}

impl RecoveryPolicy for EquityPolicy {
    fn select_repairs(&self, graph: &TwinGraph, _t_days: f64) -> Vec<NodeId> {
        if let Some(sub) = graph.substation().filter(|s| !s.is_operational()) {
            return vec![sub.id().to_string()];
        }

        let mut best: Option<(&str, usize, f64)> = None;
        for feeder in graph.damaged_assets().filter(|a| a.is_feeder()) {
            let index = feeder_index(feeder.id()).unwrap_or(usize::MAX);
            let score = self.feeder_score(graph, feeder.id());
            let better = best.is_none_or(|(_, best_index, best_score)| {
                score > best_score || (score == best_score && index < best_index)
            });
            if better {
                best = Some((feeder.id(), index, score));
            }
        }
        best.map(|(id, _, _)| vec![id.to_string()]).unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "equity"
    }
}

/// Policy variant selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Baseline,
    Equity,
}

impl PolicyKind {
    /// Accepted names.
    pub const NAMES: &[&str] = &["baseline", "equity"];
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => f.write_str("baseline"),
            Self::Equity => f.write_str("equity"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseline" => Ok(Self::Baseline),
            "equity" => Ok(Self::Equity),
            other => Err(format!(
                "unknown policy \"{other}\", available: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}
