//! Configuration types for Trellis layout.
//!
//! This module provides the configuration consumed by the layout engines.
//! All types implement [`serde::Deserialize`] for flexible loading from
//! external sources.
//!
//! # Example
//!
//! ```
//! # use trellis::config::LayoutConfig;
//! // Use default configuration
//! let config = LayoutConfig::default();
//! assert_eq!(config.node_size().width(), 300.0);
//! ```

use serde::Deserialize;

use trellis_core::geometry::Size;

/// Selects the positioning algorithm used after structural mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Layered drawing with crossing minimization (the default).
    #[default]
    Sugiyama,
    /// Plain longest-path layering with slot-per-rank placement. Also the
    /// fallback when a Sugiyama run fails.
    Layered,
}

/// Layout configuration: logical node size, spacing, and engine selection.
///
/// The layout engines treat every node as a fixed-size box; the values here
/// match the boxes the rendering surface draws.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Logical node width in pixels.
    #[serde(default = "default_node_width")]
    node_width: f32,

    /// Logical node height in pixels.
    #[serde(default = "default_node_height")]
    node_height: f32,

    /// Horizontal gap between adjacent nodes in the same rank.
    #[serde(default = "default_horizontal_spacing")]
    horizontal_spacing: f32,

    /// Vertical gap between consecutive ranks.
    #[serde(default = "default_vertical_spacing")]
    vertical_spacing: f32,

    /// Positioning engine selection.
    #[serde(default)]
    engine: EngineKind,
}

fn default_node_width() -> f32 {
    300.0
}

fn default_node_height() -> f32 {
    200.0
}

fn default_horizontal_spacing() -> f32 {
    400.0
}

fn default_vertical_spacing() -> f32 {
    150.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: default_node_width(),
            node_height: default_node_height(),
            horizontal_spacing: default_horizontal_spacing(),
            vertical_spacing: default_vertical_spacing(),
            engine: EngineKind::default(),
        }
    }
}

impl LayoutConfig {
    /// Returns the logical node size.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Returns the horizontal spacing between nodes within a rank.
    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    /// Returns the vertical spacing between ranks.
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    /// Returns the selected positioning engine.
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Horizontal distance between the centers of adjacent layout slots.
    pub fn x_step(&self) -> f32 {
        self.node_width + self.horizontal_spacing
    }

    /// Vertical distance between the centers of consecutive ranks.
    pub fn y_step(&self) -> f32 {
        self.node_height + self.vertical_spacing
    }
}
