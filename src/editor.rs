//! Pointer-driven editing on top of the graph store and viewport.
//!
//! [`Editor`] is the handle a front end holds: it owns the [`GraphStore`] and
//! the [`Viewport`], and turns raw pointer, wheel and touch events (in container
//! coordinates) into node drags, line drawing, selection and canvas pans.

use crate::config::EditorConfig;
use crate::constants::LINE_HIT_TOLERANCE;
use crate::geometry::Point;
use crate::store::GraphStore;
use crate::types::*;
use crate::viewport::{Transform, Viewport};

/// Pointer interaction in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No button held
    #[default]
    Idle,
    /// Dragging a node; `grab` is the pointer offset from the node origin in graph space
    MovingNode {
        /// Node being moved
        id: NodeId,
        /// Pointer position relative to the node origin
        grab: Point,
    },
    /// Drawing a new line from a dot
    DrawingLine {
        /// The temp line following the pointer
        line: LineId,
    },
    /// Panning the canvas
    Panning,
}

/// Editing context combining the diagram and the canvas view.
#[derive(Debug, Default)]
pub struct Editor {
    store: GraphStore,
    viewport: Viewport,
    drag: DragState,
}

impl Editor {
    /// Creates an empty editor.
    pub fn new(config: EditorConfig) -> Self {
        let config = config.normalized();
        Self {
            viewport: Viewport::new(&config),
            store: GraphStore::new(config),
            drag: DragState::Idle,
        }
    }

    /// The diagram.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Mutable access to the diagram for direct edits (add, resize, content...).
    pub fn store_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }

    /// The canvas view.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable access to the canvas view.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Current canvas transform.
    pub fn transform(&self) -> Transform {
        self.viewport.transform()
    }

    /// Pointer interaction in progress.
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    fn to_graph(&self, screen: Point) -> Point {
        self.viewport.transform().screen_to_graph(screen)
    }

    /// Handles a primary-button press.
    ///
    /// A press on a dot starts a line, on a node starts moving it, on a line
    /// selects it, and on empty canvas clears the selection and starts a pan.
    pub fn pointer_down(&mut self, screen: Point) {
        self.release();
        let p = self.to_graph(screen);

        if let Some(dot) = self.store.dot_at(p) {
            if let Some(line) = self.store.begin_line(dot.node, dot.dir) {
                self.store.drag_line_end(line, p);
                self.drag = DragState::DrawingLine { line };
                return;
            }
        }

        if let Some(id) = self.store.node_at(p) {
            self.store.set_active_node_id(Some(id));
            self.store.set_active_line_id(None);
            if let Some(node) = self.store.node(id) {
                self.drag = DragState::MovingNode {
                    id,
                    grab: p - node.origin(),
                };
            }
            return;
        }

        if let Some(line) = self.store.line_at(p, LINE_HIT_TOLERANCE) {
            self.store.set_active_line_id(Some(line));
            self.store.set_active_node_id(None);
            return;
        }

        self.store.set_active_node_id(None);
        self.store.set_active_line_id(None);
        self.viewport.pointer_down(screen);
        self.drag = DragState::Panning;
    }

    /// Handles pointer motion, with or without a button held.
    pub fn pointer_move(&mut self, screen: Point) {
        let p = self.to_graph(screen);
        self.update_hover(p);

        match self.drag {
            DragState::Idle => {}
            DragState::MovingNode { id, grab } => {
                let origin = p - grab;
                self.store.update_node_pos(id, origin.x, origin.y);
            }
            DragState::DrawingLine { line } => {
                self.store.drag_line_end(line, p);
            }
            DragState::Panning => {
                self.viewport.pointer_move(screen);
            }
        }
    }

    /// Handles a primary-button release, wherever it happens.
    ///
    /// A line being drawn is committed if released over a dot and discarded otherwise.
    pub fn pointer_up(&mut self, screen: Point) {
        if let DragState::DrawingLine { line } = self.drag {
            let p = self.to_graph(screen);
            match self.store.dot_at(p) {
                Some(dot) => {
                    self.store.commit_line(line, dot.node, dot.dir);
                }
                None => {
                    self.store.cancel_line(line);
                }
            }
            self.drag = DragState::Idle;
        }
        self.release();
    }

    /// Abandons any interaction in progress, discarding an unfinished line.
    pub fn release(&mut self) {
        match std::mem::take(&mut self.drag) {
            DragState::DrawingLine { line } => {
                self.store.cancel_line(line);
            }
            DragState::Panning => self.viewport.pointer_up(),
            DragState::MovingNode { .. } | DragState::Idle => {}
        }
    }

    /// Handles a wheel event at a container position.
    pub fn wheel(&mut self, delta_y: f32, screen: Point) {
        self.viewport.wheel(delta_y, screen);
    }

    /// Starts a two-finger pinch, ending any pointer interaction.
    pub fn pinch_start(&mut self, a: Point, b: Point) {
        self.release();
        self.viewport.pinch_start(a, b);
    }

    /// Continues a pinch.
    pub fn pinch_move(&mut self, a: Point, b: Point) {
        self.viewport.pinch_move(a, b);
    }

    /// Ends a pinch.
    pub fn pinch_end(&mut self) {
        self.viewport.pinch_end();
    }

    fn update_hover(&mut self, p: Point) {
        let node = self.store.node_at(p);
        if node != self.store.selection().hover_node_id {
            self.store.set_mouse_on_node(node);
        }
        let dot = self.store.dot_at(p);
        if dot != self.store.selection().hover_dot {
            self.store.set_mouse_on_dot(dot);
        }
    }

    /// Adds a node of the given shape.
    pub fn add_node(&mut self, node_type: NodeType) -> NodeId {
        self.release();
        self.store.add_node(node_type)
    }

    /// Deletes the active line, or else the active node.
    pub fn delete_selection(&mut self) -> bool {
        self.release();
        let selection = self.store.selection().clone();
        if let Some(line) = selection.active_line_id {
            return self.store.remove_line(line);
        }
        if let Some(node) = selection.active_node_id {
            return self.store.remove_node(node);
        }
        false
    }

    /// Duplicates the active node.
    pub fn copy_selection(&mut self) -> Option<NodeId> {
        self.release();
        let id = self.store.selection().active_node_id?;
        self.store.copy_node(id)
    }

    /// Undoes the last edit.
    pub fn undo(&mut self) -> bool {
        self.release();
        self.store.undo()
    }

    /// Redoes the last undone edit.
    pub fn redo(&mut self) -> bool {
        self.release();
        self.store.redo()
    }
}
