//! Builds the twin graph from building records.
//!
//! Topology is exactly two hops: every building hangs off its nearest
//! synthetic feeder and every feeder hangs off the one substation.

use crate::data::BuildingRecord;

use super::cluster::{Coord, centroid, kmeans_centers, nearest_center};
use super::graph::{
    AssetType, BuildingNode, GridAssetNode, Node, SUBSTATION_ID, TwinGraph, feeder_id,
    is_grid_asset_id,
};
use super::vulnerability::VulnerabilityGroup;

/// Feeder count used when none is configured.
pub const DEFAULT_FEEDER_COUNT: usize = 5;

/// Label stored for missing `event` / `damage_state` values.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Builds the substation/feeder/building graph for `records`.
///
/// 1. One building node per record, unenergized with zero outage.
/// 2. A substation at the centroid of all building coordinates.
/// 3. Feeders at the k-means centers of the coordinates; fewer than
///    `feeder_count` when there are fewer buildings.
/// 4. Each building wired to its nearest feeder.
///
/// Duplicate building ids keep the first record. Records whose id has the
/// shape of a grid-asset id (`substation:0`, `feeder:<n>`) are skipped.
/// An empty record list yields a lone substation at the origin.
pub fn build_graph(records: &[BuildingRecord], feeder_count: usize) -> TwinGraph {
    let mut graph = TwinGraph::new();
    let mut points: Vec<Coord> = Vec::with_capacity(records.len());
    let mut building_ids: Vec<&str> = Vec::with_capacity(records.len());

    for r in records {
        if is_grid_asset_id(&r.id) {
            tracing::warn!(building = %r.id, "building id collides with a grid asset id, skipping");
            continue;
        }
        let location = Coord::new(r.lat, r.lon);
        let node = BuildingNode::new(
            r.id.clone(),
            r.event.clone().unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            r.damage_state
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            VulnerabilityGroup::from_occupancy(r.occupancy.as_deref()),
            location,
        );
        if !graph.add_node(Node::Building(node)) {
            tracing::warn!(building = %r.id, "duplicate building id, keeping first record");
            continue;
        }
        points.push(location);
        building_ids.push(&r.id);
    }

    let substation_at = centroid(&points).unwrap_or(Coord::new(0.0, 0.0));
    let added = graph.add_node(Node::GridAsset(GridAssetNode::new(
        SUBSTATION_ID.to_string(),
        AssetType::Substation,
        substation_at,
    )));
    debug_assert!(added, "substation id taken by a building");

    let centers = kmeans_centers(&points, feeder_count);
    let feeder_ids: Vec<String> = (0..centers.len()).map(feeder_id).collect();
    for (fid, center) in feeder_ids.iter().zip(&centers) {
        let added = graph.add_node(Node::GridAsset(GridAssetNode::new(
            fid.clone(),
            AssetType::Feeder,
            *center,
        )));
        debug_assert!(added, "feeder id taken by a building");
        graph.add_edge(SUBSTATION_ID, fid);
    }

    for (bid, point) in building_ids.iter().zip(&points) {
        if let Some(j) = nearest_center(point, &centers) {
            graph.add_edge(bid, &feeder_ids[j]);
        }
    }

    tracing::debug!(
        buildings = points.len(),
        feeders = centers.len(),
        requested_feeders = feeder_count,
        "twin graph built"
    );
    graph
}
