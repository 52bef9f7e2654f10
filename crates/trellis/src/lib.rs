//! Trellis - a branching-workflow graph engine.
//!
//! State management and automatic layout for interactive workflow builders.
//! A workflow is a directed graph of instruction and condition steps rooted
//! at a single start node; [`FlowStore`] owns the graph and exposes the full
//! action surface, the insertion engine keeps the branching grammar intact,
//! and the layout engines assign canvas positions after every structural
//! change.
//!
//! # Examples
//!
//! ```rust
//! use trellis::{Content, FlowStore, NodeKind, StepKind, config::LayoutConfig};
//!
//! let mut store = FlowStore::new(LayoutConfig::default());
//! let start = store.start_id();
//!
//! // Append an instruction, then branch below the start.
//! store.add_node(StepKind::Instruction, start);
//! store.add_node(StepKind::Condition, start);
//!
//! // Every condition gets its follow-up instruction automatically.
//! let conditions = store
//!     .nodes()
//!     .iter()
//!     .filter(|node| node.kind == NodeKind::Condition)
//!     .count();
//! assert_eq!(conditions, 1);
//!
//! let condition = store
//!     .nodes()
//!     .iter()
//!     .find(|node| node.kind == NodeKind::Condition)
//!     .map(|node| node.id)
//!     .unwrap();
//! store.update_node_content(condition, Content::text("kettle is full?"));
//! ```

pub mod config;
pub mod verify;

mod delta;
mod error;
mod layout;
mod mutation;
mod store;

pub use trellis_core::{
    flow::{Content, Edge, FlowGraph, Node, NodeKind, StepKind},
    geometry::{Point, Size},
    identifier::Id,
};

pub use delta::{EdgeChange, NodeChange};
pub use error::TrellisError;
pub use layout::{Layered, PositionEngine, Sugiyama, ranks};
pub use store::FlowStore;
