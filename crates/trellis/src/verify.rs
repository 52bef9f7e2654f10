//! Structural checks for workflow graphs.
//!
//! Graphs produced purely by the insertion engine always satisfy these
//! checks. [`connect`](crate::FlowStore::connect) and the change passthrough
//! can break them, so callers that need the guarantees back run [`check`]
//! before treating a snapshot as a well-formed workflow.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use trellis_core::{
    flow::{FlowGraph, NodeKind},
    identifier::Id,
};

use crate::layout;

/// One way a graph can deviate from the shapes the insertion rules produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// An edge references a node id that does not resolve.
    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: Id, node: Id },

    /// A condition node has an out-degree other than one.
    #[error("condition {node} has {count} outgoing edges, expected 1")]
    ConditionOutDegree { node: Id, count: usize },

    /// A condition node's child is not an instruction.
    #[error("condition {node} is followed by {child}, which is not an instruction")]
    ConditionChildKind { node: Id, child: Id },

    /// A node fans out to a mix of condition and non-condition children.
    #[error("node {node} fans out to mixed child kinds")]
    MixedFanOut { node: Id },

    /// The graph does not hold exactly one start node.
    #[error("graph holds {count} start nodes, expected 1")]
    StartCount { count: usize },

    /// The start node has an incoming edge.
    #[error("start node {node} has an incoming edge")]
    StartHasParent { node: Id },

    /// The graph contains a directed cycle.
    #[error("graph contains a directed cycle")]
    Cycle,
}

/// Checks a snapshot against the invariants the insertion engine maintains.
///
/// Returns every violation found, not just the first one.
pub fn check(graph: &FlowGraph) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    let node_ids: HashSet<Id> = graph.nodes().iter().map(|node| node.id).collect();
    for edge in graph.edges() {
        for endpoint in [edge.source, edge.target] {
            if !node_ids.contains(&endpoint) {
                violations.push(Violation::DanglingEdge {
                    edge: edge.id,
                    node: endpoint,
                });
            }
        }
    }

    let starts: Vec<Id> = graph
        .nodes()
        .iter()
        .filter(|node| node.kind == NodeKind::Start)
        .map(|node| node.id)
        .collect();
    if starts.len() != 1 {
        violations.push(Violation::StartCount {
            count: starts.len(),
        });
    }
    for &start in &starts {
        if graph.edges().iter().any(|edge| edge.target == start) {
            violations.push(Violation::StartHasParent { node: start });
        }
    }

    let mut children: HashMap<Id, Vec<Id>> = HashMap::new();
    for edge in graph.edges() {
        children.entry(edge.source).or_default().push(edge.target);
    }

    for node in graph.nodes() {
        let child_ids = children.get(&node.id).map_or(&[][..], Vec::as_slice);

        if node.kind == NodeKind::Condition {
            if child_ids.len() != 1 {
                violations.push(Violation::ConditionOutDegree {
                    node: node.id,
                    count: child_ids.len(),
                });
            }
            for &child in child_ids {
                if graph
                    .node(child)
                    .is_some_and(|c| c.kind != NodeKind::Instruction)
                {
                    violations.push(Violation::ConditionChildKind {
                        node: node.id,
                        child,
                    });
                }
            }
        }

        if child_ids.len() > 1 {
            let condition_children = child_ids
                .iter()
                .filter(|&&child| {
                    graph
                        .node(child)
                        .is_some_and(|c| c.kind == NodeKind::Condition)
                })
                .count();
            if condition_children != 0 && condition_children != child_ids.len() {
                violations.push(Violation::MixedFanOut { node: node.id });
            }
        }
    }

    if layout::ranks(graph).is_err() {
        violations.push(Violation::Cycle);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
