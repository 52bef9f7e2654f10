//! Automatic layout for workflow graphs.
//!
//! Layout is a pure function from the structural graph to node positions.
//! The store invokes it after every structural mutation (insert, connect) and
//! on demand through `relayout`; deletions and content edits leave positions
//! untouched.
//!
//! The positioning algorithm sits behind the narrow [`PositionEngine`] trait
//! so the layering/crossing-minimization implementation can be swapped
//! without touching the insertion engine or the store:
//!
//! - [`EngineKind::Sugiyama`] (default): layered drawing via the
//!   `rust-sugiyama` crate, with horizontal offsets chosen to minimize edge
//!   crossings within a rank.
//! - [`EngineKind::Layered`]: plain longest-path layering with one slot per
//!   node in each rank. Deterministic, and the fallback when a Sugiyama run
//!   fails.
//!
//! Both engines share the same conventions: top-to-bottom rank direction,
//! fixed logical node size, a node's rank equal to its longest-path distance
//! from the roots, centers scaled by node size plus spacing, and published
//! positions converted to top-left anchors with the whole drawing normalized
//! to start at the origin.

mod layered;
mod sugiyama;

pub use layered::Layered;
pub use sugiyama::Sugiyama;

use std::collections::HashMap;

use indexmap::IndexMap;
use petgraph::{Direction, algo::toposort, graph::DiGraph};

use trellis_core::{flow::FlowGraph, geometry::Point, identifier::Id};

use crate::{config::{EngineKind, LayoutConfig}, error::TrellisError};

/// A positioning algorithm for workflow graphs.
///
/// Implementations map every node in the graph to a top-left anchor
/// position. They must be pure: same graph and config in, same positions out
/// (up to the ordering stability of the underlying algorithm).
pub trait PositionEngine {
    /// Computes positions for every node in the graph.
    ///
    /// # Errors
    /// Returns [`TrellisError::Graph`] when the edge set contains a cycle and
    /// [`TrellisError::Layout`] when the drawing algorithm fails. Callers
    /// keep the previous positions in that case.
    fn compute(
        &self,
        graph: &FlowGraph,
        config: &LayoutConfig,
    ) -> Result<IndexMap<Id, Point>, TrellisError>;
}

/// Creates the engine selected by the configuration.
pub fn engine(kind: EngineKind) -> Box<dyn PositionEngine> {
    match kind {
        EngineKind::Sugiyama => Box::new(Sugiyama),
        EngineKind::Layered => Box::new(Layered),
    }
}

/// Computes the rank (vertical tier) of every node: its longest-path
/// distance from the roots along the edge set.
///
/// This is the layering both engines draw with, exposed separately so
/// callers can compare tier assignments without depending on pixel
/// coordinates.
///
/// # Errors
/// Returns [`TrellisError::Graph`] when the edge set contains a cycle, which
/// can only arise through the grammar-bypassing connect action.
pub fn ranks(graph: &FlowGraph) -> Result<HashMap<Id, usize>, TrellisError> {
    let mut petgraph = DiGraph::<Id, ()>::new();
    let mut indices = HashMap::with_capacity(graph.node_count());

    for node in graph.nodes() {
        indices.insert(node.id, petgraph.add_node(node.id));
    }
    for edge in graph.edges() {
        if let (Some(&source), Some(&target)) =
            (indices.get(&edge.source), indices.get(&edge.target))
        {
            petgraph.add_edge(source, target, ());
        }
    }

    let order = toposort(&petgraph, None)
        .map_err(|_| TrellisError::Graph("workflow graph contains a cycle".to_string()))?;

    let mut ranks = HashMap::with_capacity(graph.node_count());
    for index in order {
        let rank = petgraph
            .neighbors_directed(index, Direction::Incoming)
            .filter_map(|parent| ranks.get(&petgraph[parent]).copied())
            .map(|parent_rank: usize| parent_rank + 1)
            .max()
            .unwrap_or(0);
        ranks.insert(petgraph[index], rank);
    }

    Ok(ranks)
}

/// Converts center coordinates to top-left anchors and shifts the whole
/// drawing so its minimum anchor lands at the origin.
fn anchor_and_normalize(
    centers: IndexMap<Id, Point>,
    config: &LayoutConfig,
) -> IndexMap<Id, Point> {
    if centers.is_empty() {
        return centers;
    }

    let size = config.node_size();
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    for center in centers.values() {
        let anchor = center.to_top_left(size);
        min_x = min_x.min(anchor.x());
        min_y = min_y.min(anchor.y());
    }

    let offset = Point::new(min_x, min_y);
    centers
        .into_iter()
        .map(|(id, center)| (id, center.to_top_left(size).sub_point(offset)))
        .collect()
}
