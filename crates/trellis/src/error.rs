//! Error types for Trellis operations.
//!
//! This module provides the internal error type [`TrellisError`]. Store
//! actions are deliberately fire-and-forget (a malformed request degrades to
//! a no-op), so these errors never cross the action surface; they flow
//! between the store and the layout machinery, where a failed layout run
//! means the previous positions are kept.

use thiserror::Error;

/// The main error type for Trellis operations.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(String),
}
