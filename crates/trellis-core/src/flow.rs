//! The workflow graph model.
//!
//! This module holds the node/edge data structures that make up a branching
//! workflow and the [`FlowGraph`] snapshot that owns them. The snapshot offers
//! read queries (children, roots, lookups) and the low-level mutators the
//! store and insertion engine build on.
//!
//! # Structural invariants
//!
//! A well-formed workflow graph is rooted and acyclic, with:
//!
//! - exactly one [`NodeKind::Start`] node, which has in-degree 0;
//! - every [`NodeKind::Condition`] node followed by exactly one
//!   [`NodeKind::Instruction`] child;
//! - fan-outs (two or more children) made up entirely of condition nodes.
//!
//! The model itself stays permissive: these rules are enforced by the
//! insertion engine in the `trellis` crate, and the bypassing `connect`
//! action can produce shapes that break them. The `trellis::verify` module
//! checks a snapshot against the rules explicitly.

use crate::{
    geometry::Point,
    identifier::Id,
};

/// The kind of a workflow node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The unique entry point of the workflow. Created once, never removed.
    Start,
    /// A linear step.
    Instruction,
    /// A branching step. Always followed by exactly one instruction.
    Condition,
}

/// The kinds of node a user can insert.
///
/// A two-variant subset of [`NodeKind`]: requesting insertion of a second
/// start node is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Instruction,
    Condition,
}

impl From<StepKind> for NodeKind {
    fn from(kind: StepKind) -> Self {
        match kind {
            StepKind::Instruction => NodeKind::Instruction,
            StepKind::Condition => NodeKind::Condition,
        }
    }
}

/// Free-form payload carried by a node.
///
/// Either a single text blob (condition expression, instruction body) or a
/// list of entries. Owned by the node and mutated only through the store's
/// content action; the core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Items(Vec<String>),
}

impl Content {
    /// Creates a text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns the text payload, or the empty string for item lists.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Items(_) => "",
        }
    }

    /// Returns true if the payload carries no data.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Items(items) => items.is_empty(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// A workflow node.
///
/// `position` is owned and overwritten exclusively by the layout engine and
/// the position delta passthrough; insertion logic never hand-edits it.
/// `selected` exists for the rendering surface's selection passthrough and is
/// semantically inert to the core.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: Id,
    pub kind: NodeKind,
    pub position: Point,
    pub content: Content,
    pub selected: bool,
}

impl Node {
    /// Creates a node of the given kind at the origin with empty content.
    pub fn new(id: Id, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            position: Point::default(),
            content: Content::default(),
            selected: false,
        }
    }

    /// Creates a node with an initial content payload.
    pub fn with_content(id: Id, kind: NodeKind, content: Content) -> Self {
        Self {
            content,
            ..Self::new(id, kind)
        }
    }
}

/// A directed edge between two workflow nodes.
///
/// `animated` is a display flag carried through the core untouched; every
/// edge the core creates is animated, matching what the rendering surface
/// expects.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: Id,
    pub source: Id,
    pub target: Id,
    pub animated: bool,
    pub selected: bool,
}

impl Edge {
    /// Creates a new animated edge.
    pub fn new(id: Id, source: Id, target: Id) -> Self {
        Self {
            id,
            source,
            target,
            animated: true,
            selected: false,
        }
    }
}

/// A snapshot of the whole workflow graph.
///
/// Nodes and edges keep their insertion order, which makes every traversal
/// the engines perform deterministic for a given history of actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl FlowGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns all edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the node with the given id, if it exists.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns a mutable reference to the node with the given id.
    pub fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    /// Checks if a node with the given id exists.
    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    /// Returns the start node, if present.
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.kind == NodeKind::Start)
    }

    /// Returns the nodes reached by a direct outgoing edge from `source`, in
    /// edge insertion order. Edges whose target no longer resolves are
    /// skipped.
    pub fn children_of(&self, source: Id) -> Vec<&Node> {
        self.edges
            .iter()
            .filter(|edge| edge.source == source)
            .filter_map(|edge| self.node(edge.target))
            .collect()
    }

    /// Returns the ids of all edges leaving `source`, in insertion order.
    pub fn outgoing_edge_ids(&self, source: Id) -> Vec<Id> {
        self.edges
            .iter()
            .filter(|edge| edge.source == source)
            .map(|edge| edge.id)
            .collect()
    }

    /// Returns a mutable reference to the edge with the given id.
    pub fn edge_mut(&mut self, id: Id) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|edge| edge.id == id)
    }

    /// Checks whether any edge already connects `source` to `target`.
    pub fn has_edge_between(&self, source: Id, target: Id) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target)
    }

    /// Returns an iterator over root nodes (nodes with no incoming edges).
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|node| !self.edges.iter().any(|edge| edge.target == node.id))
    }

    /// Adds a node to the graph.
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Adds an edge to the graph.
    ///
    /// The model does not require the endpoints to resolve; callers that care
    /// (the insertion engine, the connect action) check first.
    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Removes the node with the given id along with every edge that touches
    /// it. Returns whether a node was actually removed.
    pub fn remove_node(&mut self, id: Id) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id != id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges
            .retain(|edge| edge.source != id && edge.target != id);
        true
    }

    /// Removes the edge with the given id. Returns whether it existed.
    pub fn remove_edge(&mut self, id: Id) -> bool {
        let before = self.edges.len();
        self.edges.retain(|edge| edge.id != id);
        self.edges.len() != before
    }

    /// Removes every edge matching the predicate.
    pub fn retain_edges(&mut self, predicate: impl FnMut(&Edge) -> bool) {
        self.edges.retain(predicate);
    }
}
