//! Sugiyama layout engine.
//!
//! Based on the Sugiyama algorithm for layered drawing of directed graphs.
//! Uses the rust-sugiyama implementation with fallback to the plain layered
//! engine when a run fails.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, warn};
use rust_sugiyama::configure::Config;

use trellis_core::{flow::FlowGraph, geometry::Point, identifier::Id};

use crate::{config::LayoutConfig, error::TrellisError};

use super::{Layered, PositionEngine, anchor_and_normalize, ranks};

/// Layered drawing with crossing minimization.
///
/// Horizontal offsets come from the rust-sugiyama coordinate assignment;
/// vertical tiers come from the longest-path rank of each node, so both
/// engines agree on the layering. Weakly connected components are placed
/// side by side, and nodes that touch no edge are rowed after them.
#[derive(Debug, Default)]
pub struct Sugiyama;

impl Sugiyama {
    fn drawing_positions(
        &self,
        graph: &FlowGraph,
        config: &LayoutConfig,
        node_ranks: &HashMap<Id, usize>,
    ) -> Result<IndexMap<Id, Point>, TrellisError> {
        let x_step = config.x_step();
        let y_step = config.y_step();

        // Map node ids to dense u32 ids for rust-sugiyama
        let mut dense_ids: HashMap<Id, u32> = HashMap::with_capacity(graph.node_count());
        let mut original_ids: HashMap<u32, Id> = HashMap::with_capacity(graph.node_count());
        for (i, node) in graph.nodes().iter().enumerate() {
            dense_ids.insert(node.id, i as u32);
            original_ids.insert(i as u32, node.id);
        }

        let edges: Vec<(u32, u32)> = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                match (dense_ids.get(&edge.source), dense_ids.get(&edge.target)) {
                    // Skip self-loops
                    (Some(&source), Some(&target)) if source != target => Some((source, target)),
                    _ => None,
                }
            })
            .collect();

        let mut centers: IndexMap<Id, Point> = IndexMap::with_capacity(graph.node_count());
        let mut x_cursor = 0.0f32;

        if !edges.is_empty() {
            debug!(
                nodes = graph.node_count(),
                edges = edges.len();
                "applying Sugiyama algorithm"
            );

            // Run the rust_sugiyama crate with our dense ids, catching any panics
            let results = std::panic::catch_unwind(move || {
                let algorithm_config = Config {
                    minimum_length: 1,
                    vertex_spacing: 1.0,
                    ..Default::default()
                };
                rust_sugiyama::from_edges(&edges, &algorithm_config)
            })
            .map_err(|err| {
                let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                    format!("sugiyama layout panicked: {panic_msg}")
                } else {
                    "sugiyama layout panicked with unknown error".to_string()
                };
                TrellisError::Layout(message)
            })?;

            if results.is_empty() {
                return Err(TrellisError::Layout(
                    "sugiyama returned empty layout results".to_string(),
                ));
            }

            // One result per weakly connected component; lay them out side by side
            for (coords, _, _) in &results {
                let mut component: Vec<(Id, f32)> = Vec::with_capacity(coords.len());
                let mut component_min = f32::MAX;
                let mut component_max = f32::MIN;

                for &(id, (x, _)) in coords {
                    // Convert safely to u32 with bounds checking
                    let dense_id = if (id as u64) <= (u32::MAX as u64) {
                        id as u32
                    } else {
                        debug!(id = id as u64; "node id from sugiyama result is out of valid range");
                        continue;
                    };
                    let Some(&node_id) = original_ids.get(&dense_id) else {
                        continue;
                    };

                    let x_pos = (x as f32) * x_step;
                    component_min = component_min.min(x_pos);
                    component_max = component_max.max(x_pos);
                    component.push((node_id, x_pos));
                }

                if component.is_empty() {
                    continue;
                }

                let shift = x_cursor - component_min;
                for (node_id, x_pos) in component {
                    let rank = node_ranks.get(&node_id).copied().unwrap_or(0);
                    centers.insert(
                        node_id,
                        Point::new(x_pos + shift, rank as f32 * y_step),
                    );
                }
                x_cursor = component_max + shift + x_step;
            }

            // If mapping failed for all nodes, give up on this run
            if centers.is_empty() {
                return Err(TrellisError::Layout(
                    "failed to map any sugiyama positions back to graph nodes".to_string(),
                ));
            }
        }

        // Nodes that touch no edge get a row of their own
        for node in graph.nodes() {
            if !centers.contains_key(&node.id) {
                let rank = node_ranks.get(&node.id).copied().unwrap_or(0);
                centers.insert(node.id, Point::new(x_cursor, rank as f32 * y_step));
                x_cursor += x_step;
            }
        }

        debug!(positioned = centers.len(); "layout generated");

        Ok(anchor_and_normalize(centers, config))
    }
}

impl PositionEngine for Sugiyama {
    fn compute(
        &self,
        graph: &FlowGraph,
        config: &LayoutConfig,
    ) -> Result<IndexMap<Id, Point>, TrellisError> {
        let node_ranks = ranks(graph)?;

        match self.drawing_positions(graph, config, &node_ranks) {
            Ok(positions) => Ok(positions),
            Err(err) => {
                warn!(err:% = err; "sugiyama run failed; using layered fallback");
                Layered.compute(graph, config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    use trellis_core::flow::{Edge, Node, NodeKind};

    fn branching() -> FlowGraph {
        // start -> m -> {c1 -> f1, c2 -> f2}
        let mut graph = FlowGraph::new();
        let names = [
            ("s_start", NodeKind::Start),
            ("s_m", NodeKind::Instruction),
            ("s_c1", NodeKind::Condition),
            ("s_f1", NodeKind::Instruction),
            ("s_c2", NodeKind::Condition),
            ("s_f2", NodeKind::Instruction),
        ];
        for (name, kind) in names {
            graph.push_node(Node::new(Id::new(name), kind));
        }
        for (source, target) in [
            ("s_start", "s_m"),
            ("s_m", "s_c1"),
            ("s_c1", "s_f1"),
            ("s_m", "s_c2"),
            ("s_c2", "s_f2"),
        ] {
            graph.push_edge(Edge::new(Id::random(), Id::new(source), Id::new(target)));
        }
        graph
    }

    #[test]
    fn positions_every_node() {
        let config = LayoutConfig::default();
        let graph = branching();

        let positions = Sugiyama.compute(&graph, &config).unwrap();
        assert_eq!(positions.len(), graph.node_count());
    }

    #[test]
    fn vertical_tiers_follow_ranks() {
        let config = LayoutConfig::default();
        let graph = branching();

        let positions = Sugiyama.compute(&graph, &config).unwrap();
        let node_ranks = ranks(&graph).unwrap();

        for node in graph.nodes() {
            let expected = node_ranks[&node.id] as f32 * config.y_step();
            assert_eq!(positions[&node.id].y(), expected);
        }
    }

    #[test]
    fn coordinates_are_normalized() {
        let config = LayoutConfig::default();
        let positions = Sugiyama.compute(&branching(), &config).unwrap();

        for anchor in positions.values() {
            assert!(anchor.x() >= 0.0);
            assert!(anchor.y() >= 0.0);
        }
        assert!(positions.values().any(|anchor| anchor.x() == 0.0));
        assert!(positions.values().any(|anchor| anchor.y() == 0.0));
    }

    #[test]
    fn siblings_do_not_overlap() {
        let config = LayoutConfig::default();
        let positions = Sugiyama.compute(&branching(), &config).unwrap();

        let c1 = positions[&Id::new("s_c1")];
        let c2 = positions[&Id::new("s_c2")];
        assert!((c1.x() - c2.x()).abs() >= config.x_step() - f32::EPSILON);
    }

    #[test]
    fn edgeless_graph_rows_nodes() {
        let config = LayoutConfig::default();
        let mut graph = FlowGraph::new();
        graph.push_node(Node::new(Id::new("lone_a"), NodeKind::Start));
        graph.push_node(Node::new(Id::new("lone_b"), NodeKind::Instruction));

        let positions = Sugiyama.compute(&graph, &config).unwrap();

        let xs: HashSet<i64> = positions.values().map(|p| p.x() as i64).collect();
        assert_eq!(xs.len(), 2);
        assert!(positions.values().all(|p| p.y() == 0.0));
    }

    #[test]
    fn cycle_is_an_error() {
        let config = LayoutConfig::default();
        let mut graph = FlowGraph::new();
        graph.push_node(Node::new(Id::new("cy_a"), NodeKind::Instruction));
        graph.push_node(Node::new(Id::new("cy_b"), NodeKind::Instruction));
        graph.push_edge(Edge::new(Id::random(), Id::new("cy_a"), Id::new("cy_b")));
        graph.push_edge(Edge::new(Id::random(), Id::new("cy_b"), Id::new("cy_a")));

        assert!(Sugiyama.compute(&graph, &config).is_err());
    }
}
