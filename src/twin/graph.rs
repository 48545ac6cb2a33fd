//! Arena-style twin graph: node records keyed by id plus adjacency sets.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::cluster::Coord;
use super::vulnerability::VulnerabilityGroup;

/// Stable node identifier.
pub type NodeId = String;

/// Id of the single substation.
pub const SUBSTATION_ID: &str = "substation:0";

const FEEDER_PREFIX: &str = "feeder:";

/// Builds the id of the feeder with the given index.
pub fn feeder_id(index: usize) -> NodeId {
    format!("{FEEDER_PREFIX}{index}")
}

/// Index encoded in a feeder id, or `None` if `id` is not of the form
/// `feeder:<index>`.
pub fn feeder_index(id: &str) -> Option<usize> {
    id.strip_prefix(FEEDER_PREFIX)?.parse().ok()
}

/// `true` if `id` has the shape of a grid-asset id. Such ids cannot be
/// used for buildings.
pub fn is_grid_asset_id(id: &str) -> bool {
    id == SUBSTATION_ID || feeder_index(id).is_some()
}

/// Discriminates the two node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Building,
    GridAsset,
}

/// Grid asset subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Substation,
    Feeder,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substation => f.write_str("substation"),
            Self::Feeder => f.write_str("feeder"),
        }
    }
}

/// A building served by the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingNode {
    id: NodeId,
    event: String,
    damage_state: String,
    vulnerability_group: VulnerabilityGroup,
    is_energized: bool,
    outage_duration_days: f64,
    lat: f64,
    lon: f64,
}

impl BuildingNode {
    /// Creates an unenergized building with no accumulated outage.
    pub(crate) fn new(
        id: NodeId,
        event: String,
        damage_state: String,
        vulnerability_group: VulnerabilityGroup,
        location: Coord,
    ) -> Self {
        Self {
            id,
            event,
            damage_state,
            vulnerability_group,
            is_energized: false,
            outage_duration_days: 0.0,
            lat: location.lat,
            lon: location.lon,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Hazard event that damaged the building.
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn damage_state(&self) -> &str {
        &self.damage_state
    }

    pub fn vulnerability_group(&self) -> VulnerabilityGroup {
        self.vulnerability_group
    }

    pub fn is_energized(&self) -> bool {
        self.is_energized
    }

    /// Total days spent without power so far.
    pub fn outage_duration_days(&self) -> f64 {
        self.outage_duration_days
    }

    pub fn location(&self) -> Coord {
        Coord::new(self.lat, self.lon)
    }

    pub(crate) fn set_energized(&mut self, energized: bool) {
        self.is_energized = energized;
    }

    /// Adds `dt_days` of outage if the building is dark. Energized buildings
    /// keep their total unchanged.
    pub(crate) fn accumulate_outage(&mut self, dt_days: f64) {
        if !self.is_energized {
            self.outage_duration_days += dt_days.max(0.0);
        }
    }
}

/// A substation or feeder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridAssetNode {
    id: NodeId,
    asset_type: AssetType,
    is_operational: bool,
    lat: f64,
    lon: f64,
}

impl GridAssetNode {
    /// Creates a damaged (non-operational) asset.
    pub(crate) fn new(id: NodeId, asset_type: AssetType, location: Coord) -> Self {
        Self {
            id,
            asset_type,
            is_operational: false,
            lat: location.lat,
            lon: location.lon,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn is_substation(&self) -> bool {
        self.asset_type == AssetType::Substation
    }

    pub fn is_feeder(&self) -> bool {
        self.asset_type == AssetType::Feeder
    }

    pub fn is_operational(&self) -> bool {
        self.is_operational
    }

    pub fn location(&self) -> Coord {
        Coord::new(self.lat, self.lon)
    }

    /// Marks the asset repaired. Operational flags never revert.
    pub(crate) fn mark_operational(&mut self) {
        self.is_operational = true;
    }
}

/// A node of the twin graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node_type", rename_all = "snake_case")]
pub enum Node {
    Building(BuildingNode),
    GridAsset(GridAssetNode),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Building(b) => b.id(),
            Node::GridAsset(g) => g.id(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Building(_) => NodeType::Building,
            Node::GridAsset(_) => NodeType::GridAsset,
        }
    }

    pub fn as_building(&self) -> Option<&BuildingNode> {
        match self {
            Node::Building(b) => Some(b),
            Node::GridAsset(_) => None,
        }
    }

    pub fn as_grid_asset(&self) -> Option<&GridAssetNode> {
        match self {
            Node::GridAsset(g) => Some(g),
            Node::Building(_) => None,
        }
    }
}

/// Undirected graph of buildings and grid assets.
///
/// Nodes live in an id-keyed map and edges in per-node neighbor sets.
/// Both maps are ordered so iteration is deterministic. The node set and
/// edges are fixed once the builder is done; only attributes change.
#[derive(Debug, Clone, Default)]
pub struct TwinGraph {
    nodes: BTreeMap<NodeId, Node>,
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl TwinGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a node. Returns `false` and leaves the graph untouched if the
    /// id is already present.
    pub(crate) fn add_node(&mut self, node: Node) -> bool {
        let id = node.id().to_string();
        if self.nodes.contains_key(&id) {
            return false;
        }
        self.adjacency.insert(id.clone(), BTreeSet::new());
        self.nodes.insert(id, node);
        true
    }

    /// Connects two existing nodes. Unknown ids and self-loops are ignored.
    pub(crate) fn add_edge(&mut self, a: &str, b: &str) {
        if a == b || !self.nodes.contains_key(a) || !self.nodes.contains_key(b) {
            return;
        }
        if let Some(n) = self.adjacency.get_mut(a) {
            n.insert(b.to_string());
        }
        if let Some(n) = self.adjacency.get_mut(b) {
            n.insert(a.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn building(&self, id: &str) -> Option<&BuildingNode> {
        self.node(id).and_then(Node::as_building)
    }

    pub fn grid_asset(&self, id: &str) -> Option<&GridAssetNode> {
        self.node(id).and_then(Node::as_grid_asset)
    }

    /// The substation, if the graph has one.
    pub fn substation(&self) -> Option<&GridAssetNode> {
        self.grid_asset(SUBSTATION_ID)
    }

    /// Neighbors of `id` in ascending id order. Empty for unknown ids.
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Node> + use<'a> {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(move |n| self.nodes.get(n))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn buildings(&self) -> impl Iterator<Item = &BuildingNode> + '_ {
        self.nodes.values().filter_map(Node::as_building)
    }

    pub fn grid_assets(&self) -> impl Iterator<Item = &GridAssetNode> + '_ {
        self.nodes.values().filter_map(Node::as_grid_asset)
    }

    pub fn feeders(&self) -> impl Iterator<Item = &GridAssetNode> + '_ {
        self.grid_assets().filter(|g| g.is_feeder())
    }

    /// Grid assets still waiting for repair.
    pub fn damaged_assets(&self) -> impl Iterator<Item = &GridAssetNode> + '_ {
        self.grid_assets().filter(|g| !g.is_operational())
    }

    /// Feeders adjacent to a building.
    pub fn feeders_of<'a>(
        &'a self,
        building_id: &str,
    ) -> impl Iterator<Item = &'a GridAssetNode> + use<'a> {
        self.neighbors(building_id)
            .filter_map(Node::as_grid_asset)
            .filter(|g| g.is_feeder())
    }

    /// Buildings adjacent to a feeder.
    pub fn buildings_served_by<'a>(
        &'a self,
        feeder: &str,
    ) -> impl Iterator<Item = &'a BuildingNode> + use<'a> {
        self.neighbors(feeder).filter_map(Node::as_building)
    }

    /// Marks a grid asset operational.
    ///
    /// Returns `true` if `id` names a grid asset (already-operational assets
    /// count). Building ids and unknown ids are left alone and return `false`.
    pub fn mark_operational(&mut self, id: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(Node::GridAsset(g)) => {
                g.mark_operational();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn buildings_mut(&mut self) -> impl Iterator<Item = &mut BuildingNode> + '_ {
        self.nodes.values_mut().filter_map(|n| match n {
            Node::Building(b) => Some(b),
            Node::GridAsset(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_asset_ids_are_recognized() {
        assert_eq!(feeder_index("feeder:12"), Some(12));
        assert_eq!(feeder_index(&feeder_id(3)), Some(3));
        assert_eq!(feeder_index("feeder:x"), None);
        assert_eq!(feeder_index("B1"), None);
        assert!(is_grid_asset_id(SUBSTATION_ID));
        assert!(is_grid_asset_id("feeder:0"));
        assert!(!is_grid_asset_id("substation:1"));
        assert!(!is_grid_asset_id("feeder-0"));
    }

    fn sample_graph() -> TwinGraph {
        let mut g = TwinGraph::new();
        g.add_node(Node::GridAsset(GridAssetNode::new(
            SUBSTATION_ID.to_string(),
            AssetType::Substation,
            Coord::new(0.0, 0.0),
        )));
        g.add_node(Node::GridAsset(GridAssetNode::new(
            feeder_id(0),
            AssetType::Feeder,
            Coord::new(1.0, 1.0),
        )));
        g.add_node(Node::Building(BuildingNode::new(
            "B1".to_string(),
            "Michael".to_string(),
            "minor".to_string(),
            VulnerabilityGroup::Residential,
            Coord::new(1.0, 1.1),
        )));
        g.add_edge(SUBSTATION_ID, "feeder:0");
        g.add_edge("B1", "feeder:0");
        g
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut g = sample_graph();
        let dup = Node::GridAsset(GridAssetNode::new(
            feeder_id(0),
            AssetType::Feeder,
            Coord::new(5.0, 5.0),
        ));
        assert!(!g.add_node(dup));
        assert_eq!(g.grid_asset("feeder:0").map(|f| f.location().lat), Some(1.0));
    }

    #[test]
    fn edges_are_undirected() {
        let g = sample_graph();
        assert_eq!(g.edge_count(), 2);
        let from_feeder: Vec<&str> = g.neighbors("feeder:0").map(Node::id).collect();
        assert_eq!(from_feeder, vec!["B1", SUBSTATION_ID]);
        assert_eq!(g.feeders_of("B1").count(), 1);
        assert_eq!(g.buildings_served_by("feeder:0").count(), 1);
    }

    #[test]
    fn edges_to_unknown_nodes_are_ignored() {
        let mut g = sample_graph();
        g.add_edge("B1", "feeder:9");
        g.add_edge("B1", "B1");
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.neighbors("nope").count(), 0);
    }

    #[test]
    fn mark_operational_only_touches_grid_assets() {
        let mut g = sample_graph();
        assert!(!g.mark_operational("B1"));
        assert!(!g.mark_operational("feeder:7"));
        assert!(g.mark_operational("feeder:0"));
        assert!(g.grid_asset("feeder:0").is_some_and(GridAssetNode::is_operational));
        assert_eq!(g.damaged_assets().count(), 1);
    }

    #[test]
    fn outage_only_accumulates_while_dark() {
        let mut b = BuildingNode::new(
            "B1".into(),
            "unknown".into(),
            "unknown".into(),
            VulnerabilityGroup::Unknown,
            Coord::new(0.0, 0.0),
        );
        b.accumulate_outage(1.5);
        b.set_energized(true);
        b.accumulate_outage(3.0);
        assert_eq!(b.outage_duration_days(), 1.5);
    }

    #[test]
    fn node_type_matches_variant() {
        let g = sample_graph();
        let node = g.node("feeder:0").map(|n| n.node_type());
        assert_eq!(node, Some(NodeType::GridAsset));
    }
}
