//! Tagged change variants for the rendering surface's passthrough.
//!
//! The rendering surface applies free-form drag/select/remove diffs directly,
//! without going through the insertion engine or triggering layout. Instead
//! of an open-ended dynamic payload, the accepted operations form a closed
//! set of variants so the fold logic can be matched exhaustively.

use log::debug;

use trellis_core::{
    flow::{FlowGraph, NodeKind},
    geometry::Point,
    identifier::Id,
};

/// A single change to the node set.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// Move a node (drag passthrough).
    Position { id: Id, position: Point },
    /// Toggle a node's selection flag.
    Select { id: Id, selected: bool },
    /// Remove a node. Incident edges are removed with it.
    Remove { id: Id },
}

/// A single change to the edge set.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeChange {
    /// Toggle an edge's selection flag.
    Select { id: Id, selected: bool },
    /// Remove an edge.
    Remove { id: Id },
}

/// Folds node changes into the graph. Changes referencing unknown ids are
/// dropped silently; removing the start node is refused.
pub(crate) fn apply_node_changes(graph: &mut FlowGraph, changes: &[NodeChange]) {
    for change in changes {
        match *change {
            NodeChange::Position { id, position } => {
                if let Some(node) = graph.node_mut(id) {
                    node.position = position;
                }
            }
            NodeChange::Select { id, selected } => {
                if let Some(node) = graph.node_mut(id) {
                    node.selected = selected;
                }
            }
            NodeChange::Remove { id } => {
                if graph.node(id).is_some_and(|node| node.kind == NodeKind::Start) {
                    debug!(node_id:% = id; "refusing to remove the start node");
                    continue;
                }
                graph.remove_node(id);
            }
        }
    }
}

/// Folds edge changes into the graph. Unknown ids are dropped silently.
pub(crate) fn apply_edge_changes(graph: &mut FlowGraph, changes: &[EdgeChange]) {
    for change in changes {
        match *change {
            EdgeChange::Select { id, selected } => {
                if let Some(edge) = graph.edge_mut(id) {
                    edge.selected = selected;
                }
            }
            EdgeChange::Remove { id } => {
                graph.remove_edge(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use trellis_core::flow::{Edge, Node};

    fn two_step_graph() -> FlowGraph {
        let mut graph = FlowGraph::new();
        graph.push_node(Node::new(Id::new("d_start"), NodeKind::Start));
        graph.push_node(Node::new(Id::new("d_a"), NodeKind::Instruction));
        graph.push_edge(Edge::new(Id::new("d_e"), Id::new("d_start"), Id::new("d_a")));
        graph
    }

    #[test]
    fn position_change_moves_single_node() {
        let mut graph = two_step_graph();
        let target = Point::new(42.0, 24.0);

        apply_node_changes(
            &mut graph,
            &[NodeChange::Position {
                id: Id::new("d_a"),
                position: target,
            }],
        );

        assert_eq!(graph.node(Id::new("d_a")).unwrap().position, target);
        assert!(graph.node(Id::new("d_start")).unwrap().position.is_zero());
    }

    #[test]
    fn select_change_flags_node() {
        let mut graph = two_step_graph();

        apply_node_changes(
            &mut graph,
            &[NodeChange::Select {
                id: Id::new("d_a"),
                selected: true,
            }],
        );

        assert!(graph.node(Id::new("d_a")).unwrap().selected);
    }

    #[test]
    fn remove_change_cascades_to_edges() {
        let mut graph = two_step_graph();

        apply_node_changes(&mut graph, &[NodeChange::Remove { id: Id::new("d_a") }]);

        assert!(!graph.contains_node(Id::new("d_a")));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn start_node_cannot_be_removed() {
        let mut graph = two_step_graph();

        apply_node_changes(
            &mut graph,
            &[NodeChange::Remove {
                id: Id::new("d_start"),
            }],
        );

        assert!(graph.contains_node(Id::new("d_start")));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut graph = two_step_graph();
        let before = graph.clone();

        apply_node_changes(
            &mut graph,
            &[
                NodeChange::Remove {
                    id: Id::new("d_missing"),
                },
                NodeChange::Select {
                    id: Id::new("d_missing"),
                    selected: true,
                },
            ],
        );
        apply_edge_changes(
            &mut graph,
            &[EdgeChange::Remove {
                id: Id::new("d_missing"),
            }],
        );

        assert_eq!(graph, before);
    }

    #[test]
    fn edge_select_and_remove() {
        let mut graph = two_step_graph();

        apply_edge_changes(
            &mut graph,
            &[EdgeChange::Select {
                id: Id::new("d_e"),
                selected: true,
            }],
        );
        assert!(graph.edges()[0].selected);

        apply_edge_changes(&mut graph, &[EdgeChange::Remove { id: Id::new("d_e") }]);
        assert_eq!(graph.edge_count(), 0);
        // Nodes untouched
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn changes_apply_in_order() {
        let mut graph = two_step_graph();

        apply_node_changes(
            &mut graph,
            &[
                NodeChange::Position {
                    id: Id::new("d_a"),
                    position: Point::new(1.0, 1.0),
                },
                NodeChange::Position {
                    id: Id::new("d_a"),
                    position: Point::new(2.0, 2.0),
                },
            ],
        );

        assert_eq!(
            graph.node(Id::new("d_a")).unwrap().position,
            Point::new(2.0, 2.0)
        );
    }
}
