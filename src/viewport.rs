//! Pan and zoom of the infinite canvas.
//!
//! The viewport owns the shared [`Transform`] and the state of the gesture in
//! progress. A gesture lives exactly from its start event to its end event:
//! pointer-up or touch-end always returns the machine to [`Gesture::Idle`],
//! wherever the pointer happens to be.

use crate::config::EditorConfig;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Maps graph space to screen space: `screen = graph * scale + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal pan offset in screen pixels
    pub x: f32,
    /// Vertical pan offset in screen pixels
    pub y: f32,
    /// Zoom factor (1.0 = normal)
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Pan offset as a point.
    pub fn offset(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Converts container coordinates to graph coordinates.
    pub fn screen_to_graph(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }

    /// Converts graph coordinates to container coordinates.
    pub fn graph_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.x, p.y * self.scale + self.y)
    }
}

/// Notification sent after every change of scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomChanged {
    /// The transform after the change
    pub transform: Transform,
}

/// Canvas pan in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    start_pointer: Point,
    start_offset: Point,
}

/// Two-finger pinch in progress. Every move is computed from these initial values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    start_distance: f32,
    start_scale: f32,
    start_mid: Point,
    start_offset: Point,
}

/// Gesture currently driving the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No gesture active
    #[default]
    Idle,
    /// Dragging the canvas with a pointer
    Panning(PanGesture),
    /// Pinching with two touch points
    Pinching(PinchGesture),
}

/// Owns the canvas transform and handles pan/zoom input.
#[derive(Debug)]
pub struct Viewport {
    transform: Transform,
    gesture: Gesture,
    min_scale: f32,
    max_scale: f32,
    zoom_speed: f32,
    subscribers: Vec<Sender<ZoomChanged>>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Viewport {
    /// Creates a viewport at the identity transform.
    pub fn new(config: &EditorConfig) -> Self {
        let config = config.clone().normalized();
        Self {
            transform: Transform::default(),
            gesture: Gesture::Idle,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            zoom_speed: config.zoom_speed,
            subscribers: Vec::new(),
        }
    }

    /// Current transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Gesture in progress.
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Whether a pan is in progress.
    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning(_))
    }

    /// Whether a pinch is in progress.
    pub fn is_pinching(&self) -> bool {
        matches!(self.gesture, Gesture::Pinching(_))
    }

    /// Scale bounds as `(min, max)`.
    pub fn scale_bounds(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    /// Registers for zoom-changed notifications.
    ///
    /// Dropping the receiver unsubscribes on the next notification.
    pub fn subscribe(&mut self) -> Receiver<ZoomChanged> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.transform.scale;
        }
        scale.clamp(self.min_scale, self.max_scale)
    }

    fn apply(&mut self, next: Transform) {
        let scale_changed = next.scale != self.transform.scale;
        self.transform = next;
        if scale_changed {
            let event = ZoomChanged { transform: next };
            self.subscribers.retain(|tx| tx.send(event).is_ok());
        }
    }

    /// Replaces the transform, clamping its scale.
    pub fn set_transform(&mut self, transform: Transform) {
        let scale = self.clamp_scale(transform.scale);
        self.apply(Transform { scale, ..transform });
    }

    /// Sets the scale around the container origin, clamped to the bounds.
    pub fn set_scale(&mut self, scale: f32) {
        let scale = self.clamp_scale(scale);
        self.apply(Transform {
            scale,
            ..self.transform
        });
    }

    /// Returns to the identity transform.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.set_transform(Transform::default());
    }

    /// Zooms to `scale` keeping the graph point under `anchor` (container coordinates) fixed.
    pub fn zoom_at(&mut self, anchor: Point, scale: f32) {
        let t = self.transform;
        let new_scale = self.clamp_scale(scale);
        let point = t.screen_to_graph(anchor);
        self.apply(Transform {
            x: anchor.x - point.x * new_scale,
            y: anchor.y - point.y * new_scale,
            scale: new_scale,
        });
    }

    /// Handles a wheel event at `mouse` (container coordinates).
    ///
    /// Each event changes the scale by `zoom_speed` relative to the current value,
    /// zooming in for negative `delta_y`.
    pub fn wheel(&mut self, delta_y: f32, mouse: Point) {
        if delta_y == 0.0 || delta_y.is_nan() {
            return;
        }
        let direction = -delta_y.signum();
        let scale = self.transform.scale * (1.0 + direction * self.zoom_speed);
        self.zoom_at(mouse, scale);
    }

    // ---- pan -----------------------------------------------------------

    /// Starts panning from a pointer press on empty canvas.
    pub fn pointer_down(&mut self, pointer: Point) {
        if self.is_pinching() {
            return;
        }
        self.gesture = Gesture::Panning(PanGesture {
            start_pointer: pointer,
            start_offset: self.transform.offset(),
        });
    }

    /// Continues a pan. Returns false if no pan is in progress.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Gesture::Panning(pan) = self.gesture else {
            return false;
        };
        let offset = pan.start_offset + (pointer - pan.start_pointer);
        self.apply(Transform {
            x: offset.x,
            y: offset.y,
            ..self.transform
        });
        true
    }

    /// Ends a pan.
    pub fn pointer_up(&mut self) {
        if self.is_panning() {
            self.gesture = Gesture::Idle;
        }
    }

    // ---- pinch ---------------------------------------------------------

    /// Starts a pinch with two touch points, replacing any pan in progress.
    pub fn pinch_start(&mut self, a: Point, b: Point) {
        self.gesture = Gesture::Pinching(PinchGesture {
            start_distance: (a - b).length(),
            start_scale: self.transform.scale,
            start_mid: a.midpoint(b),
            start_offset: self.transform.offset(),
        });
    }

    /// Continues a pinch. Returns false if no pinch is in progress.
    ///
    /// Scale follows the ratio of the current to the initial finger distance and the
    /// offset follows the midpoint's movement. Both are applied to the initial transform.
    pub fn pinch_move(&mut self, a: Point, b: Point) -> bool {
        let Gesture::Pinching(pinch) = self.gesture else {
            return false;
        };
        let ratio = if pinch.start_distance > f32::EPSILON {
            (a - b).length() / pinch.start_distance
        } else {
            1.0
        };
        let new_scale = self.clamp_scale(pinch.start_scale * ratio);
        let offset = pinch.start_offset + (a.midpoint(b) - pinch.start_mid);
        self.apply(Transform {
            x: offset.x,
            y: offset.y,
            scale: new_scale,
        });
        true
    }

    /// Ends a pinch.
    pub fn pinch_end(&mut self) {
        if self.is_pinching() {
            self.gesture = Gesture::Idle;
        }
    }
}
