//! Plain geometry value types shared by the model, hit testing, and painting.
//!
//! Canvas coordinates are `f32`, y grows downward, and every rectangle is
//! stored as top-left origin plus size.

use serde::{Deserialize, Serialize};

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle (top-left origin + size).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Inclusive containment test.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

}

// ─── Metrics ─────────────────────────────────────────────────────────────

/// Fixed sizes every node and port is laid out with.
///
/// A node's height is never stored independently: it is always
/// `row_height * output_count` (see [`NodeMetrics::node_height`]).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMetrics {
    /// Width of a freshly created node.
    pub node_width: f32,
    /// Height of one output-port row.
    pub row_height: f32,
    /// Port rectangle width.
    pub port_width: f32,
    /// Port rectangle height.
    pub port_height: f32,
    /// How far a port rectangle overlaps into the node body.
    pub port_inset: f32,
    /// Title given to nodes created from the canvas.
    pub default_title: String,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            row_height: 50.0,
            port_width: 10.0,
            port_height: 20.0,
            port_inset: 8.0,
            default_title: "Node".to_string(),
        }
    }
}

impl NodeMetrics {
    /// Height of a node that owns `output_count` output ports.
    pub fn node_height(&self, output_count: usize) -> f32 {
        self.row_height * output_count as f32
    }
}
