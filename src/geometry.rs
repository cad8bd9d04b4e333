//! Connection-dot geometry.
//!
//! Pure functions mapping a node's shape and size to its dot offsets, and a node
//! plus a dot direction to the absolute coordinates a line endpoint should use.

use crate::error::GraphError;
use crate::types::{Direction, Dot, Node, NodeType};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point (or vector) in graph or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length when treated as a vector.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Computes the four connection dots for a node shape.
///
/// Offsets place each dot's bounding square so its center sits on the middle of
/// the corresponding side. Diamonds and circles are laid out on a square of side
/// `max(width, height)`.
pub fn compute_dots(node_type: NodeType, width: f32, height: f32, radius: f32) -> [Dot; 4] {
    let (w, h) = match node_type {
        NodeType::Rect => (width, height),
        NodeType::Diamond | NodeType::Circle => {
            let size = width.max(height);
            (size, size)
        }
    };

    Direction::ALL.map(|dir| {
        let (left, top) = match dir {
            Direction::Left => (-radius, h / 2.0 - radius),
            Direction::Right => (w - radius, h / 2.0 - radius),
            Direction::Top => (w / 2.0 - radius, -radius),
            Direction::Bottom => (w / 2.0 - radius, h - radius),
        };
        Dot {
            dir,
            radius,
            left,
            top,
        }
    })
}

/// Absolute graph coordinates of a line end attached to `node` at `dir`.
///
/// A missing dot means dot recomputation was skipped somewhere; that is a
/// contract violation and panics in debug builds.
pub fn resolve_edge_endpoint(node: &Node, dir: Direction) -> Result<Point, GraphError> {
    match node.dot(dir) {
        Some(dot) => Ok(Point::new(node.x + dot.left, node.y + dot.top)),
        None => {
            debug_assert!(false, "node {} has no '{}' dot", node.id, dir);
            Err(GraphError::MissingDot { node: node.id, dir })
        }
    }
}

/// Center of a node's dot in graph space.
pub fn dot_center(node: &Node, dot: &Dot) -> Point {
    Point::new(node.x + dot.left + dot.radius, node.y + dot.top + dot.radius)
}

/// Distance from a point to the segment `start..end`.
///
/// The point is projected onto the segment, clamped to its endpoints.
pub fn distance_to_segment(p: Point, start: Point, end: Point) -> f32 {
    let seg = end - start;
    let rel = p - start;
    let len_sq = seg.x * seg.x + seg.y * seg.y;
    if len_sq < 0.0001 {
        return rel.length();
    }
    let t = ((rel.x * seg.x + rel.y * seg.y) / len_sq).clamp(0.0, 1.0);
    let projection = Point::new(start.x + seg.x * t, start.y + seg.y * t);
    (p - projection).length()
}
