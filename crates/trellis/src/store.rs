//! The graph store: single owner of the workflow snapshot.
//!
//! [`FlowStore`] holds the one authoritative copy of the graph. Presentation
//! widgets never mutate state directly; they invoke the actions here and
//! re-render from the read-only snapshot afterwards. Every action is a single
//! synchronous transition: read the snapshot, compute the next one, commit.
//!
//! Actions are fire-and-forget. A request naming an unknown id is a silent
//! no-op, and a failed layout run keeps the previous positions; nothing here
//! panics or surfaces an error to the caller.

use log::{debug, info, trace, warn};

use trellis_core::{
    flow::{Content, Edge, FlowGraph, Node, NodeKind, StepKind},
    identifier::Id,
};

use crate::{
    config::LayoutConfig,
    delta::{self, EdgeChange, NodeChange},
    layout::{self, PositionEngine},
    mutation,
};

/// Label shown on the start node by the rendering surface.
const START_LABEL: &str = "Starting point";

/// The owner of the current workflow graph and the only mutation path.
///
/// # Examples
///
/// ```
/// use trellis::{FlowStore, StepKind, config::LayoutConfig};
///
/// let mut store = FlowStore::new(LayoutConfig::default());
/// let start = store.start_id();
///
/// store.add_node(StepKind::Instruction, start);
/// assert_eq!(store.nodes().len(), 2);
/// assert_eq!(store.edges().len(), 1);
/// ```
pub struct FlowStore {
    graph: FlowGraph,
    config: LayoutConfig,
    engine: Box<dyn PositionEngine>,
}

impl Default for FlowStore {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl FlowStore {
    /// Creates a store seeded with the unique start node at the origin.
    pub fn new(config: LayoutConfig) -> Self {
        let engine = layout::engine(config.engine());
        Self::with_engine(config, engine)
    }

    /// Creates a store with a caller-provided positioning engine.
    pub fn with_engine(config: LayoutConfig, engine: Box<dyn PositionEngine>) -> Self {
        let mut graph = FlowGraph::new();
        let start = Node::with_content(Id::random(), NodeKind::Start, Content::text(START_LABEL));
        let start_id = start.id;
        graph.push_node(start);

        info!(start_id:% = start_id; "flow store initialized");
        Self {
            graph,
            config,
            engine,
        }
    }

    /// Returns the id of the start node.
    pub fn start_id(&self) -> Id {
        self.graph
            .start_node()
            .expect("store always holds a start node")
            .id
    }

    /// Returns the current snapshot.
    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    /// Returns the current nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    /// Returns the current edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// Inserts a step below `source_id` according to the branching rules,
    /// then recomputes the layout.
    ///
    /// No-op when `source_id` does not resolve.
    pub fn add_node(&mut self, kind: StepKind, source_id: Id) {
        if mutation::insert_step(&mut self.graph, kind, source_id) {
            self.reposition();
            trace!(nodes = self.graph.node_count(), edges = self.graph.edge_count(); "snapshot committed");
        }
    }

    /// Removes a node and every edge touching it.
    ///
    /// Survivor positions are left as they are; layout is not recomputed on
    /// deletion. No-op for unknown ids and for the start node.
    pub fn delete_node(&mut self, id: Id) {
        if self
            .graph
            .node(id)
            .is_some_and(|node| node.kind == NodeKind::Start)
        {
            debug!(node_id:% = id; "delete ignored: start node is permanent");
            return;
        }
        if self.graph.remove_node(id) {
            debug!(node_id:% = id; "node deleted");
        } else {
            debug!(node_id:% = id; "delete ignored: node not found");
        }
    }

    /// Replaces the content of the matching node; every other node is left
    /// untouched. No-op for unknown ids.
    pub fn update_node_content(&mut self, id: Id, content: Content) {
        if let Some(node) = self.graph.node_mut(id) {
            node.content = content;
        }
    }

    /// Creates an edge between two existing nodes, bypassing the branching
    /// rules, then recomputes the layout.
    ///
    /// No-op when either id does not resolve or the identical source→target
    /// connection already exists. No structural validation is performed; this
    /// can produce shapes the insertion rules never would (see
    /// [`crate::verify`]).
    pub fn connect(&mut self, source_id: Id, target_id: Id) {
        if !self.graph.contains_node(source_id) || !self.graph.contains_node(target_id) {
            debug!(source_id:% = source_id, target_id:% = target_id; "connect ignored: endpoint not found");
            return;
        }
        if self.graph.has_edge_between(source_id, target_id) {
            debug!(source_id:% = source_id, target_id:% = target_id; "connect ignored: edge already exists");
            return;
        }

        self.graph
            .push_edge(Edge::new(Id::random(), source_id, target_id));
        self.reposition();
    }

    /// Folds node changes from the rendering surface into the snapshot.
    ///
    /// Neither the insertion engine nor the layout engine is involved.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
        delta::apply_node_changes(&mut self.graph, changes);
    }

    /// Folds edge changes from the rendering surface into the snapshot.
    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) {
        delta::apply_edge_changes(&mut self.graph, changes);
    }

    /// Recomputes every node position from the current structure.
    pub fn relayout(&mut self) {
        self.reposition();
    }

    fn reposition(&mut self) {
        match self.engine.compute(&self.graph, &self.config) {
            Ok(positions) => {
                for (&id, &position) in &positions {
                    if let Some(node) = self.graph.node_mut(id) {
                        node.position = position;
                    }
                }
            }
            Err(err) => {
                warn!(err:% = err; "layout failed; keeping previous positions");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_holds_only_the_start_node() {
        let store = FlowStore::new(LayoutConfig::default());

        assert_eq!(store.nodes().len(), 1);
        assert_eq!(store.edges().len(), 0);
        assert_eq!(store.nodes()[0].kind, NodeKind::Start);
        assert_eq!(store.nodes()[0].content.as_text(), START_LABEL);
        assert!(store.nodes()[0].position.is_zero());
    }

    #[test]
    fn add_node_with_unknown_source_changes_nothing() {
        let mut store = FlowStore::new(LayoutConfig::default());

        store.add_node(StepKind::Instruction, Id::new("st_missing"));

        assert_eq!(store.nodes().len(), 1);
        assert_eq!(store.edges().len(), 0);
    }

    #[test]
    fn add_node_repositions_the_graph() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();

        store.add_node(StepKind::Instruction, start);
        store.add_node(StepKind::Instruction, start);

        // start, first instruction, spliced instruction
        assert_eq!(store.nodes().len(), 3);
        let ys: Vec<f32> = store.nodes().iter().map(|n| n.position.y()).collect();
        assert!(ys.contains(&0.0));
        assert!(ys.iter().any(|&y| y > 0.0));
    }

    #[test]
    fn delete_node_protects_the_start() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();
        store.add_node(StepKind::Instruction, start);

        store.delete_node(start);

        assert!(store.graph().contains_node(start));
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn delete_node_cascades_edges_without_relayout() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();
        store.add_node(StepKind::Instruction, start);
        let child = store
            .nodes()
            .iter()
            .find(|n| n.kind == NodeKind::Instruction)
            .unwrap()
            .id;
        let start_position = store.graph().node(start).unwrap().position;

        store.delete_node(child);

        assert!(!store.graph().contains_node(child));
        assert_eq!(store.edges().len(), 0);
        assert_eq!(store.graph().node(start).unwrap().position, start_position);
    }

    #[test]
    fn delete_unknown_node_is_a_noop() {
        let mut store = FlowStore::new(LayoutConfig::default());

        store.delete_node(Id::new("st_missing"));

        assert_eq!(store.nodes().len(), 1);
    }

    #[test]
    fn update_node_content_touches_one_node() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();
        store.add_node(StepKind::Instruction, start);
        let child = store
            .nodes()
            .iter()
            .find(|n| n.kind == NodeKind::Instruction)
            .unwrap()
            .id;

        store.update_node_content(child, Content::text("pour the water"));

        assert_eq!(
            store.graph().node(child).unwrap().content.as_text(),
            "pour the water"
        );
        assert_eq!(store.graph().node(start).unwrap().content.as_text(), START_LABEL);
    }

    #[test]
    fn update_content_with_unknown_id_is_a_noop() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();

        store.update_node_content(Id::new("st_missing"), Content::text("nope"));

        assert_eq!(store.graph().node(start).unwrap().content.as_text(), START_LABEL);
    }

    #[test]
    fn connect_links_existing_nodes() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();
        store.add_node(StepKind::Condition, start);
        store.add_node(StepKind::Condition, start);
        let conditions: Vec<Id> = store
            .nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::Condition)
            .map(|n| n.id)
            .collect();
        let edges_before = store.edges().len();

        store.connect(conditions[0], conditions[1]);

        assert_eq!(store.edges().len(), edges_before + 1);
        assert!(store.graph().has_edge_between(conditions[0], conditions[1]));
        assert!(store.edges().last().unwrap().animated);
    }

    #[test]
    fn connect_dedups_identical_pairs() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();
        store.add_node(StepKind::Instruction, start);
        let child = store
            .nodes()
            .iter()
            .find(|n| n.kind == NodeKind::Instruction)
            .unwrap()
            .id;
        let edges_before = store.edges().len();

        store.connect(start, child);

        assert_eq!(store.edges().len(), edges_before);
    }

    #[test]
    fn connect_with_unknown_endpoint_is_a_noop() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();

        store.connect(start, Id::new("st_missing"));
        store.connect(Id::new("st_missing"), start);

        assert_eq!(store.edges().len(), 0);
    }

    #[test]
    fn node_changes_flow_through_the_store() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();
        store.add_node(StepKind::Instruction, start);
        let child = store
            .nodes()
            .iter()
            .find(|n| n.kind == NodeKind::Instruction)
            .unwrap()
            .id;

        store.apply_node_changes(&[NodeChange::Select {
            id: child,
            selected: true,
        }]);
        assert!(store.graph().node(child).unwrap().selected);

        store.apply_node_changes(&[NodeChange::Remove { id: child }]);
        assert!(!store.graph().contains_node(child));
        assert_eq!(store.edges().len(), 0);
    }

    #[test]
    fn edge_changes_flow_through_the_store() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();
        store.add_node(StepKind::Instruction, start);
        let edge = store.edges()[0].id;

        store.apply_edge_changes(&[EdgeChange::Remove { id: edge }]);

        assert_eq!(store.edges().len(), 0);
        assert_eq!(store.nodes().len(), 2);
    }

    #[test]
    fn relayout_restores_engine_positions_after_drag() {
        let mut store = FlowStore::new(LayoutConfig::default());
        let start = store.start_id();
        store.add_node(StepKind::Instruction, start);
        let positions_before: Vec<_> =
            store.nodes().iter().map(|n| (n.id, n.position)).collect();

        store.apply_node_changes(&[NodeChange::Position {
            id: start,
            position: trellis_core::geometry::Point::new(-500.0, 77.0),
        }]);
        store.relayout();

        let positions_after: Vec<_> =
            store.nodes().iter().map(|n| (n.id, n.position)).collect();
        assert_eq!(positions_before, positions_after);
    }
}
