//! Plain longest-path layered engine.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use trellis_core::{flow::FlowGraph, geometry::Point, identifier::Id};

use crate::{config::LayoutConfig, error::TrellisError};

use super::{PositionEngine, anchor_and_normalize, ranks};

/// A simple deterministic layered layout.
///
/// Every node goes to the rank given by its longest-path distance from the
/// roots; within a rank, nodes take consecutive horizontal slots in node
/// insertion order. No crossing minimization is attempted, which is exactly
/// what makes the result stable under re-runs.
#[derive(Debug, Default)]
pub struct Layered;

impl PositionEngine for Layered {
    fn compute(
        &self,
        graph: &FlowGraph,
        config: &LayoutConfig,
    ) -> Result<IndexMap<Id, Point>, TrellisError> {
        let ranks = ranks(graph)?;

        let mut by_rank: BTreeMap<usize, Vec<Id>> = BTreeMap::new();
        for node in graph.nodes() {
            by_rank.entry(ranks[&node.id]).or_default().push(node.id);
        }

        let mut centers = IndexMap::with_capacity(graph.node_count());
        for (rank, ids) in by_rank {
            for (slot, id) in ids.into_iter().enumerate() {
                centers.insert(
                    id,
                    Point::new(slot as f32 * config.x_step(), rank as f32 * config.y_step()),
                );
            }
        }

        Ok(anchor_and_normalize(centers, config))
    }
}
