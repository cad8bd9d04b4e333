//! Core data types for the diagram editor.
//!
//! This module defines the node, dot and line structures that make up a diagram,
//! together with the transient selection state the editor tracks alongside them.

use crate::geometry::{compute_dots, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for diagram nodes.
pub type NodeId = Uuid;

/// Unique identifier for lines (edges) between nodes.
pub type LineId = Uuid;

/// Side of a node on which a connection dot sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Left edge
    #[serde(rename = "l")]
    Left,
    /// Right edge
    #[serde(rename = "r")]
    Right,
    /// Top edge
    #[serde(rename = "t")]
    Top,
    /// Bottom edge
    #[serde(rename = "b")]
    Bottom,
}

impl Direction {
    /// All directions in the order dots are stored on a node.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Left => "l",
            Direction::Right => "r",
            Direction::Top => "t",
            Direction::Bottom => "b",
        };
        f.write_str(s)
    }
}

/// Shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Axis-aligned rectangle
    #[default]
    Rect,
    /// Square rotated by 45 degrees
    Diamond,
    /// Circle inscribed in a square
    Circle,
}

impl NodeType {
    /// Whether this shape is constrained to a square bounding box.
    pub fn is_square(self) -> bool {
        matches!(self, NodeType::Diamond | NodeType::Circle)
    }
}

/// Display status of a node, derived from selection and hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// The node is the active (selected) node
    Active,
    /// The pointer is over the node
    Hover,
    /// Neither selected nor hovered
    #[default]
    Normal,
}

/// A connection point on a node boundary.
///
/// `left`/`top` are the offset from the node origin to the top-left of the dot's
/// bounding square, so the dot's center lies on the node's edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    /// Side of the node the dot belongs to
    pub dir: Direction,
    /// Rendered radius of the dot
    pub radius: f32,
    /// Horizontal offset from the node origin
    pub left: f32,
    /// Vertical offset from the node origin
    pub top: f32,
}

/// A shaped, positioned node in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,
    /// Label shown inside the node
    pub content: String,
    /// Left edge in graph space
    pub x: f32,
    /// Top edge in graph space
    pub y: f32,
    /// Shape width
    pub width: f32,
    /// Shape height
    pub height: f32,
    /// Shape of the node
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Current display status
    #[serde(default)]
    pub status: NodeStatus,
    /// Connection dots, recomputed whenever shape or size changes
    pub dots: Vec<Dot>,
}

impl Node {
    /// Creates a node with a fresh id and dots computed for its shape.
    pub fn new(
        node_type: NodeType,
        content: String,
        position: Point,
        size: (f32, f32),
        dot_radius: f32,
    ) -> Self {
        let mut node = Self {
            id: Uuid::new_v4(),
            content,
            x: position.x,
            y: position.y,
            width: size.0,
            height: size.1,
            node_type,
            status: NodeStatus::Normal,
            dots: Vec::new(),
        };
        node.recompute_dots(dot_radius);
        node
    }

    /// Top-left corner in graph space.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the dot on the given side, if present.
    pub fn dot(&self, dir: Direction) -> Option<&Dot> {
        self.dots.iter().find(|d| d.dir == dir)
    }

    /// Whether a graph-space point lies within the node's drawn shape.
    pub fn contains(&self, p: Point) -> bool {
        let in_box = p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height;
        if !in_box {
            return false;
        }
        let (rx, ry) = (self.width / 2.0, self.height / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return true;
        }
        // Offsets from the center, normalised to the half extents.
        let dx = (p.x - self.x - rx).abs() / rx;
        let dy = (p.y - self.y - ry).abs() / ry;
        match self.node_type {
            NodeType::Rect => true,
            NodeType::Diamond => dx + dy <= 1.0,
            NodeType::Circle => dx * dx + dy * dy <= 1.0,
        }
    }

    /// Re-derives `dots` from the node's type and size.
    ///
    /// Square shapes have both extents forced to the larger of the two first.
    pub fn recompute_dots(&mut self, dot_radius: f32) {
        if self.node_type.is_square() {
            let side = self.width.max(self.height);
            self.width = side;
            self.height = side;
        }
        self.dots = compute_dots(self.node_type, self.width, self.height, dot_radius).to_vec();
    }
}

/// A line connecting a dot on one node to a dot on another.
///
/// The `from_*`/`to_*` coordinates are absolute graph positions cached from the
/// endpoint nodes. A `temp` line is still being drawn; its `to` end may not be
/// attached to a node yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Unique identifier for this line
    pub id: LineId,
    /// Source node
    pub from_node: NodeId,
    /// Destination node, `None` while the line is being drawn
    pub to_node: Option<NodeId>,
    /// Dot on the source node
    pub from_dot: Direction,
    /// Dot on the destination node
    pub to_dot: Option<Direction>,
    /// Cached absolute x of the source end
    pub from_x: f32,
    /// Cached absolute y of the source end
    pub from_y: f32,
    /// Cached absolute x of the destination end
    pub to_x: f32,
    /// Cached absolute y of the destination end
    pub to_y: f32,
    /// Whether the line is still being drawn
    pub temp: bool,
}

impl Line {
    /// Creates a committed line between two dots. Coordinates are resolved by the store.
    pub fn new(from_node: NodeId, from_dot: Direction, to_node: NodeId, to_dot: Direction) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_node,
            to_node: Some(to_node),
            from_dot,
            to_dot: Some(to_dot),
            from_x: 0.0,
            from_y: 0.0,
            to_x: 0.0,
            to_y: 0.0,
            temp: false,
        }
    }

    /// Creates a line being drawn from a dot, with its loose end at `start`.
    pub fn temp(from_node: NodeId, from_dot: Direction, start: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_node,
            to_node: None,
            from_dot,
            to_dot: None,
            from_x: start.x,
            from_y: start.y,
            to_x: start.x,
            to_y: start.y,
            temp: true,
        }
    }

    /// Whether either end of the line is attached to the given node.
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == Some(node_id)
    }

    /// Applies the fields set in a patch.
    pub fn apply(&mut self, patch: &LinePatch) {
        if let Some(v) = patch.from_node {
            self.from_node = v;
        }
        if let Some(v) = patch.to_node {
            self.to_node = Some(v);
        }
        if let Some(v) = patch.from_dot {
            self.from_dot = v;
        }
        if let Some(v) = patch.to_dot {
            self.to_dot = Some(v);
        }
        if let Some(v) = patch.to_x {
            self.to_x = v;
        }
        if let Some(v) = patch.to_y {
            self.to_y = v;
        }
        if let Some(v) = patch.temp {
            self.temp = v;
        }
    }
}

/// Partial update for a [`Line`]; `None` fields are left untouched.
///
/// Absolute source coordinates are not patchable: they are always derived from
/// the source node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinePatch {
    /// New source node
    pub from_node: Option<NodeId>,
    /// New destination node
    pub to_node: Option<NodeId>,
    /// New source dot
    pub from_dot: Option<Direction>,
    /// New destination dot
    pub to_dot: Option<Direction>,
    /// New loose-end x (only meaningful for temp lines)
    pub to_x: Option<f32>,
    /// New loose-end y (only meaningful for temp lines)
    pub to_y: Option<f32>,
    /// New temp flag
    pub temp: Option<bool>,
}

/// A dot the pointer is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverDot {
    /// Node carrying the dot
    pub node: NodeId,
    /// Side of the dot
    pub dir: Direction,
}

/// Transient selection and hover state. Never stored in history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Currently active node, if any
    pub active_node_id: Option<NodeId>,
    /// Currently active line, if any
    pub active_line_id: Option<LineId>,
    /// Node under the pointer, if any
    pub hover_node_id: Option<NodeId>,
    /// Dot under the pointer, if any
    pub hover_dot: Option<HoverDot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(
            NodeType::Rect,
            "Start".to_string(),
            Point::new(10.0, 20.0),
            (100.0, 50.0),
            7.0,
        );

        assert_eq!(node.content, "Start");
        assert_eq!(node.origin(), Point::new(10.0, 20.0));
        assert_eq!(node.status, NodeStatus::Normal);
        assert_eq!(node.dots.len(), 4);
        assert!(!node.id.is_nil());
    }

    #[test]
    fn test_square_shapes_are_squared() {
        let node = Node::new(
            NodeType::Diamond,
            String::new(),
            Point::new(0.0, 0.0),
            (80.0, 50.0),
            7.0,
        );
        assert_eq!(node.width, 80.0);
        assert_eq!(node.height, 80.0);
    }

    #[test]
    fn test_node_contains() {
        let node = Node::new(NodeType::Rect, String::new(), Point::new(0.0, 0.0), (100.0, 50.0), 7.0);
        assert!(node.contains(Point::new(50.0, 25.0)));
        assert!(node.contains(Point::new(100.0, 50.0)));
        assert!(!node.contains(Point::new(101.0, 25.0)));
        assert!(!node.contains(Point::new(50.0, -1.0)));
    }

    #[test]
    fn test_shaped_nodes_exclude_corners() {
        let diamond = Node::new(NodeType::Diamond, String::new(), Point::new(0.0, 0.0), (100.0, 100.0), 7.0);
        assert!(diamond.contains(Point::new(50.0, 50.0)));
        assert!(diamond.contains(Point::new(50.0, 1.0)));
        assert!(diamond.contains(Point::new(25.0, 25.0)));
        assert!(!diamond.contains(Point::new(5.0, 5.0)));
        assert!(!diamond.contains(Point::new(95.0, 90.0)));

        let circle = Node::new(NodeType::Circle, String::new(), Point::new(10.0, 10.0), (100.0, 100.0), 7.0);
        assert!(circle.contains(Point::new(60.0, 60.0)));
        assert!(circle.contains(Point::new(10.0, 60.0)));
        assert!(circle.contains(Point::new(25.0, 25.0)));
        assert!(!circle.contains(Point::new(12.0, 12.0)));
        assert!(!circle.contains(Point::new(108.0, 15.0)));
    }

    #[test]
    fn test_line_touches() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let line = Line::new(a, Direction::Right, b, Direction::Left);
        assert!(line.touches(a));
        assert!(line.touches(b));
        assert!(!line.touches(Uuid::new_v4()));

        let temp = Line::temp(a, Direction::Top, Point::new(1.0, 2.0));
        assert!(temp.temp);
        assert!(temp.touches(a));
        assert_eq!(temp.to_node, None);
    }

    #[test]
    fn test_line_patch_applies_only_set_fields() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut line = Line::temp(a, Direction::Right, Point::new(0.0, 0.0));
        line.apply(&LinePatch {
            to_node: Some(b),
            to_dot: Some(Direction::Left),
            temp: Some(false),
            ..Default::default()
        });
        assert_eq!(line.from_node, a);
        assert_eq!(line.to_node, Some(b));
        assert_eq!(line.to_dot, Some(Direction::Left));
        assert!(!line.temp);
    }

    #[test]
    fn test_direction_serializes_as_letter() {
        let json = serde_json::to_string(&Direction::Bottom).unwrap();
        assert_eq!(json, "\"b\"");
        let node_type = serde_json::to_string(&NodeType::Diamond).unwrap();
        assert_eq!(node_type, "\"diamond\"");
    }

    #[test]
    fn test_line_fields_serialize_camel_case() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let line = Line::new(a, Direction::Right, b, Direction::Left);
        let json = serde_json::to_value(&line).unwrap();
        for key in ["fromNode", "toNode", "fromDot", "toDot", "fromX", "fromY", "toX", "toY", "temp"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("from_node").is_none());
        assert_eq!(json["fromDot"], "r");

        let restored: Line = serde_json::from_value(json).unwrap();
        assert_eq!(restored, line);
    }
}
