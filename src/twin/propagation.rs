//! Boolean power propagation over the two-hop twin topology.

use std::collections::BTreeSet;

use super::graph::TwinGraph;

/// Recomputes every building's energized flag from grid asset status.
///
/// A building is energized iff the substation exists and is operational
/// and at least one of its feeder neighbors is operational. The topology
/// is building → feeder → substation by construction, so no path search
/// is needed. The result depends only on the operational flags, so
/// calling this twice in a row changes nothing the second time.
///
/// # Returns
///
/// Number of energized buildings after the update.
pub fn propagate_power(graph: &mut TwinGraph) -> usize {
    let substation_ok = graph.substation().is_some_and(|s| s.is_operational());

    let energized: BTreeSet<String> = if substation_ok {
        graph
            .buildings()
            .filter(|b| graph.feeders_of(b.id()).any(|f| f.is_operational()))
            .map(|b| b.id().to_string())
            .collect()
    } else {
        BTreeSet::new()
    };

    for b in graph.buildings_mut() {
        let on = energized.contains(b.id());
        b.set_energized(on);
    }
    energized.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BuildingRecord;
    use crate::twin::builder::build_graph;
    use crate::twin::graph::SUBSTATION_ID;

    fn two_feeder_graph() -> TwinGraph {
        let records = vec![
            BuildingRecord::new("B1", 29.0, -85.0),
            BuildingRecord::new("B2", 26.0, -82.0),
        ];
        build_graph(&records, 2)
    }

    fn energized(graph: &TwinGraph) -> Vec<bool> {
        graph.buildings().map(|b| b.is_energized()).collect()
    }

    #[test]
    fn nothing_energized_while_everything_is_down() {
        let mut g = two_feeder_graph();
        assert_eq!(propagate_power(&mut g), 0);
        assert_eq!(energized(&g), vec![false, false]);
    }

    #[test]
    fn feeder_without_substation_is_not_enough() {
        let mut g = two_feeder_graph();
        g.mark_operational("feeder:0");
        g.mark_operational("feeder:1");
        assert_eq!(propagate_power(&mut g), 0);
    }

    #[test]
    fn substation_without_feeder_is_not_enough() {
        let mut g = two_feeder_graph();
        g.mark_operational(SUBSTATION_ID);
        assert_eq!(propagate_power(&mut g), 0);
    }

    #[test]
    fn only_buildings_behind_repaired_feeders_light_up() {
        let mut g = two_feeder_graph();
        g.mark_operational(SUBSTATION_ID);
        g.mark_operational("feeder:0");
        assert_eq!(propagate_power(&mut g), 1);

        let lit: Vec<&str> = g
            .buildings()
            .filter(|b| b.is_energized())
            .map(|b| b.id())
            .collect();
        let served: Vec<&str> = g.buildings_served_by("feeder:0").map(|b| b.id()).collect();
        assert_eq!(lit, served);
    }

    #[test]
    fn propagation_is_idempotent() {
        let mut g = two_feeder_graph();
        g.mark_operational(SUBSTATION_ID);
        g.mark_operational("feeder:1");
        let first_count = propagate_power(&mut g);
        let first = energized(&g);
        let second_count = propagate_power(&mut g);
        assert_eq!(first_count, second_count);
        assert_eq!(first, energized(&g));
    }
}
