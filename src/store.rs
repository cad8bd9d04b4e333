//! The graph store: owner of nodes, lines, selection and undo history.
//!
//! All mutation goes through [`GraphStore`] so that cached line coordinates and
//! node dots stay consistent with node positions and shapes. Unknown ids are
//! logged and ignored rather than treated as errors.

use crate::config::EditorConfig;
use crate::error::GraphError;
use crate::geometry::{distance_to_segment, dot_center, resolve_edge_endpoint, Point};
use crate::history::{History, Snapshot};
use crate::types::*;
use uuid::Uuid;

/// Owns the diagram and its history.
#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<Node>,
    lines: Vec<Line>,
    selection: Selection,
    history: History,
    config: EditorConfig,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl GraphStore {
    /// Creates an empty store.
    pub fn new(config: EditorConfig) -> Self {
        let config = config.normalized();
        Self {
            nodes: Vec::new(),
            lines: Vec::new(),
            selection: Selection::default(),
            history: History::new(config.history_limit),
            config,
        }
    }

    /// All nodes, in paint order (last is topmost).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All lines, including one being drawn.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Current selection and hover state.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Undo/redo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Configuration the store was built with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Looks up a line by id.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// The active node, if one is selected and still exists.
    pub fn active_node(&self) -> Option<&Node> {
        self.selection.active_node_id.and_then(|id| self.node(id))
    }

    /// The active line, if one is selected and still exists.
    pub fn active_line(&self) -> Option<&Line> {
        self.selection.active_line_id.and_then(|id| self.line(id))
    }

    /// The node under the pointer, if any.
    pub fn hover_node(&self) -> Option<&Node> {
        self.selection.hover_node_id.and_then(|id| self.node(id))
    }

    fn node_index(&self, id: NodeId) -> Result<usize, GraphError> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(GraphError::NodeNotFound(id))
    }

    fn line_index(&self, id: LineId) -> Result<usize, GraphError> {
        self.lines
            .iter()
            .position(|l| l.id == id)
            .ok_or(GraphError::LineNotFound(id))
    }

    // ---- history -------------------------------------------------------

    /// Deep copy of the committed diagram.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.nodes, &self.lines)
    }

    /// Records the current diagram as an undo point and clears redo.
    pub fn save_to_history(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    /// Restores the most recent undo point. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                log::debug!("undo: {} entries left", self.history.past_len());
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone state. Returns false if there was none.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                log::debug!("redo: {} entries left", self.history.future_len());
                true
            }
            None => false,
        }
    }

    /// Returns true if there are entries that can be undone.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are entries that can be redone.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.lines = snapshot.lines;
        self.selection = Selection::default();
        self.sync_status();
    }

    /// Replaces the whole diagram with a loaded document and drops history.
    ///
    /// Dots and line coordinates are re-derived, and lines whose endpoints do not
    /// exist in the document are discarded.
    pub fn load(&mut self, snapshot: Snapshot) {
        let Snapshot { mut nodes, lines } = snapshot;
        for node in &mut nodes {
            node.recompute_dots(self.config.dot_radius);
        }
        let before = lines.len();
        let mut lines: Vec<Line> = lines
            .into_iter()
            .filter(|l| {
                !l.temp
                    && l.to_dot.is_some()
                    && nodes.iter().any(|n| n.id == l.from_node)
                    && l.to_node.is_some_and(|to| nodes.iter().any(|n| n.id == to))
            })
            .collect();
        if lines.len() != before {
            log::warn!("load: dropped {} dangling lines", before - lines.len());
        }
        for line in &mut lines {
            resolve_line(line, &nodes);
        }
        self.nodes = nodes;
        self.lines = lines;
        self.selection = Selection::default();
        self.history.clear();
        self.sync_status();
    }

    // ---- nodes ---------------------------------------------------------

    /// Adds a node of the given shape, staggered from previous ones, and makes it active.
    pub fn add_node(&mut self, node_type: NodeType) -> NodeId {
        self.save_to_history();

        let count = self.nodes.len();
        let step = (count % self.config.spawn_wrap) as f32 * self.config.spawn_step;
        let position = Point::new(
            self.config.spawn_origin.0 + step,
            self.config.spawn_origin.1 + step,
        );
        let node = Node::new(
            node_type,
            format!("node {}", count + 1),
            position,
            (self.config.node_width, self.config.node_height),
            self.config.dot_radius,
        );
        let id = node.id;
        log::debug!("add_node {id} ({node_type:?}) at ({}, {})", position.x, position.y);
        self.nodes.push(node);
        self.set_active_node_id(Some(id));
        id
    }

    /// Moves a node and drags the ends of its lines along. Not recorded in history.
    pub fn update_node_pos(&mut self, id: NodeId, x: f32, y: f32) -> bool {
        let idx = match self.node_index(id) {
            Ok(idx) => idx,
            Err(err) => {
                log::warn!("update_node_pos ignored: {err}");
                return false;
            }
        };
        self.nodes[idx].x = x;
        self.nodes[idx].y = y;
        self.refresh_incident_lines(id);
        true
    }

    /// Resizes a node, recomputing its dots and the ends of its lines.
    pub fn update_node_size(&mut self, id: NodeId, width: f32, height: f32) -> bool {
        let idx = match self.node_index(id) {
            Ok(idx) => idx,
            Err(err) => {
                log::warn!("update_node_size ignored: {err}");
                return false;
            }
        };
        self.save_to_history();
        let radius = self.config.dot_radius;
        let node = &mut self.nodes[idx];
        node.width = width.max(0.0);
        node.height = height.max(0.0);
        node.recompute_dots(radius);
        self.refresh_incident_lines(id);
        true
    }

    /// Changes a node's label.
    pub fn update_node_content(&mut self, id: NodeId, content: impl Into<String>) -> bool {
        let idx = match self.node_index(id) {
            Ok(idx) => idx,
            Err(err) => {
                log::warn!("update_node_content ignored: {err}");
                return false;
            }
        };
        let content = content.into();
        if self.nodes[idx].content == content {
            return true;
        }
        self.save_to_history();
        self.nodes[idx].content = content;
        true
    }

    /// Changes a node's shape, recomputing its dots and the ends of its lines.
    pub fn update_node_type(&mut self, id: NodeId, node_type: NodeType) -> bool {
        let idx = match self.node_index(id) {
            Ok(idx) => idx,
            Err(err) => {
                log::warn!("update_node_type ignored: {err}");
                return false;
            }
        };
        self.save_to_history();
        let radius = self.config.dot_radius;
        let node = &mut self.nodes[idx];
        node.node_type = node_type;
        node.recompute_dots(radius);
        self.refresh_incident_lines(id);
        true
    }

    /// Removes a node and every line attached to it.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let idx = match self.node_index(id) {
            Ok(idx) => idx,
            Err(err) => {
                log::warn!("remove_node ignored: {err}");
                return false;
            }
        };
        self.save_to_history();

        if self.selection.active_node_id == Some(id) {
            self.selection.active_node_id = None;
        }
        if self.selection.hover_node_id == Some(id) {
            self.selection.hover_node_id = None;
        }
        if self.selection.hover_dot.is_some_and(|d| d.node == id) {
            self.selection.hover_dot = None;
        }

        let before = self.lines.len();
        self.lines.retain(|l| !l.touches(id));
        if let Some(active) = self.selection.active_line_id {
            if !self.lines.iter().any(|l| l.id == active) {
                self.selection.active_line_id = None;
            }
        }
        self.nodes.remove(idx);
        log::debug!("remove_node {id}: cascaded {} lines", before - self.lines.len());
        true
    }

    /// Duplicates a node (without its lines), offset diagonally, and makes the copy active.
    pub fn copy_node(&mut self, id: NodeId) -> Option<NodeId> {
        let idx = match self.node_index(id) {
            Ok(idx) => idx,
            Err(err) => {
                log::warn!("copy_node ignored: {err}");
                return None;
            }
        };
        self.save_to_history();
        let offset = self.config.copy_offset;
        let copy = Node {
            id: Uuid::new_v4(),
            x: self.nodes[idx].x + offset,
            y: self.nodes[idx].y + offset,
            status: NodeStatus::Normal,
            ..self.nodes[idx].clone()
        };
        let copy_id = copy.id;
        self.nodes.push(copy);
        self.set_active_node_id(Some(copy_id));
        Some(copy_id)
    }

    // ---- lines ---------------------------------------------------------

    /// Adds a line, resolving its cached coordinates from its endpoint nodes.
    ///
    /// Committed lines are recorded in history; temp lines are not. Lines that
    /// reference unknown nodes are rejected.
    pub fn add_line(&mut self, mut line: Line) -> Option<LineId> {
        if let Err(err) = self.check_line_refs(&line) {
            log::warn!("add_line ignored: {err}");
            return None;
        }
        if !line.temp {
            self.save_to_history();
        }
        resolve_line(&mut line, &self.nodes);
        let id = line.id;
        self.lines.push(line);
        Some(id)
    }

    /// Removes a line.
    pub fn remove_line(&mut self, id: LineId) -> bool {
        let idx = match self.line_index(id) {
            Ok(idx) => idx,
            Err(err) => {
                log::warn!("remove_line ignored: {err}");
                return false;
            }
        };
        self.save_to_history();
        self.lines.remove(idx);
        if self.selection.active_line_id == Some(id) {
            self.selection.active_line_id = None;
        }
        true
    }

    /// Applies a partial update to a line and re-resolves its coordinates.
    pub fn update_line(&mut self, id: LineId, patch: LinePatch) -> bool {
        let idx = match self.line_index(id) {
            Ok(idx) => idx,
            Err(err) => {
                log::warn!("update_line ignored: {err}");
                return false;
            }
        };
        let mut updated = self.lines[idx].clone();
        updated.apply(&patch);
        if let Err(err) = self.check_line_refs(&updated) {
            log::warn!("update_line {id} ignored: {err}");
            return false;
        }
        self.save_to_history();
        resolve_line(&mut updated, &self.nodes);
        self.lines[idx] = updated;
        true
    }

    /// Starts drawing a line from a node's dot. The line is temp until committed.
    pub fn begin_line(&mut self, from_node: NodeId, from_dot: Direction) -> Option<LineId> {
        let node = match self.node(from_node) {
            Some(node) => node,
            None => {
                log::warn!("begin_line ignored: {}", GraphError::NodeNotFound(from_node));
                return None;
            }
        };
        let start = match resolve_edge_endpoint(node, from_dot) {
            Ok(p) => p,
            Err(err) => {
                log::error!("begin_line ignored: {err}");
                return None;
            }
        };
        let line = Line::temp(from_node, from_dot, start);
        let id = line.id;
        self.lines.push(line);
        Some(id)
    }

    /// Moves the loose end of a line being drawn. Not recorded in history.
    pub fn drag_line_end(&mut self, id: LineId, to: Point) -> bool {
        match self.lines.iter_mut().find(|l| l.id == id) {
            Some(line) if line.temp => {
                line.to_x = to.x;
                line.to_y = to.y;
                true
            }
            Some(_) => {
                log::warn!("drag_line_end ignored: line {id} is already committed");
                false
            }
            None => {
                log::warn!("drag_line_end ignored: {}", GraphError::LineNotFound(id));
                false
            }
        }
    }

    /// Attaches the loose end of a line being drawn to a dot, making it a regular line.
    ///
    /// Dropping the line back onto the dot it started from discards it instead.
    pub fn commit_line(&mut self, id: LineId, to_node: NodeId, to_dot: Direction) -> bool {
        let idx = match self.line_index(id) {
            Ok(idx) if self.lines[idx].temp => idx,
            Ok(_) => {
                log::warn!("commit_line ignored: line {id} is already committed");
                return false;
            }
            Err(err) => {
                log::warn!("commit_line ignored: {err}");
                return false;
            }
        };
        if let Err(err) = self.node_index(to_node) {
            log::warn!("commit_line ignored: {err}");
            self.lines.remove(idx);
            return false;
        }
        let line = &self.lines[idx];
        if line.from_node == to_node && line.from_dot == to_dot {
            log::debug!("commit_line {id}: dropped onto its own dot, discarding");
            self.lines.remove(idx);
            return false;
        }

        self.save_to_history();
        let line = &mut self.lines[idx];
        line.to_node = Some(to_node);
        line.to_dot = Some(to_dot);
        line.temp = false;
        resolve_line(line, &self.nodes);
        true
    }

    /// Discards a line that is still being drawn.
    pub fn cancel_line(&mut self, id: LineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !(l.id == id && l.temp));
        before != self.lines.len()
    }

    fn check_line_refs(&self, line: &Line) -> Result<(), GraphError> {
        self.node_index(line.from_node)?;
        if let Some(to) = line.to_node {
            self.node_index(to)?;
        }
        if !line.temp && (line.to_node.is_none() || line.to_dot.is_none()) {
            return Err(GraphError::IncompleteLine(line.id));
        }
        Ok(())
    }

    /// Re-resolves the ends of every line attached to `node_id`, each using its own dot.
    fn refresh_incident_lines(&mut self, node_id: NodeId) {
        let Some(node) = self.nodes.iter().find(|n| n.id == node_id) else {
            return;
        };
        for line in self.lines.iter_mut() {
            if line.from_node == node_id {
                match resolve_edge_endpoint(node, line.from_dot) {
                    Ok(p) => {
                        line.from_x = p.x;
                        line.from_y = p.y;
                    }
                    Err(err) => log::error!("line {}: {err}", line.id),
                }
            }
            if !line.temp && line.to_node == Some(node_id) {
                if let Some(dir) = line.to_dot {
                    match resolve_edge_endpoint(node, dir) {
                        Ok(p) => {
                            line.to_x = p.x;
                            line.to_y = p.y;
                        }
                        Err(err) => log::error!("line {}: {err}", line.id),
                    }
                }
            }
        }
    }

    // ---- selection -----------------------------------------------------

    /// Sets (or clears) the active node.
    pub fn set_active_node_id(&mut self, id: Option<NodeId>) {
        self.selection.active_node_id = id;
        self.sync_status();
    }

    /// Sets (or clears) the active line.
    pub fn set_active_line_id(&mut self, id: Option<LineId>) {
        self.selection.active_line_id = id;
    }

    /// Records which node the pointer is over.
    pub fn set_mouse_on_node(&mut self, id: Option<NodeId>) {
        self.selection.hover_node_id = id;
        self.sync_status();
    }

    /// Records which dot the pointer is over.
    pub fn set_mouse_on_dot(&mut self, dot: Option<HoverDot>) {
        self.selection.hover_dot = dot;
    }

    /// Clears active and hover state.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
        self.sync_status();
    }

    fn sync_status(&mut self) {
        let active = self.selection.active_node_id;
        let hover = self.selection.hover_node_id;
        for node in &mut self.nodes {
            node.status = if Some(node.id) == active {
                NodeStatus::Active
            } else if Some(node.id) == hover {
                NodeStatus::Hover
            } else {
                NodeStatus::Normal
            };
        }
    }

    // ---- hit testing ---------------------------------------------------

    /// Topmost node containing a graph-space point.
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        self.nodes.iter().rev().find(|n| n.contains(p)).map(|n| n.id)
    }

    /// Dot whose circle contains a graph-space point, topmost node first.
    pub fn dot_at(&self, p: Point) -> Option<HoverDot> {
        self.nodes.iter().rev().find_map(|node| {
            node.dots
                .iter()
                .find(|dot| (dot_center(node, dot) - p).length() <= dot.radius)
                .map(|dot| HoverDot {
                    node: node.id,
                    dir: dot.dir,
                })
        })
    }

    /// Topmost committed line passing within `tolerance` of a graph-space point.
    pub fn line_at(&self, p: Point, tolerance: f32) -> Option<LineId> {
        self.lines
            .iter()
            .rev()
            .filter(|l| !l.temp)
            .find(|l| {
                let start = Point::new(l.from_x, l.from_y);
                let end = Point::new(l.to_x, l.to_y);
                distance_to_segment(p, start, end) <= tolerance
            })
            .map(|l| l.id)
    }
}

/// Sets a line's cached coordinates from its endpoint nodes.
///
/// The source end is always resolved; the destination end only once the line is committed.
fn resolve_line(line: &mut Line, nodes: &[Node]) {
    if let Some(node) = nodes.iter().find(|n| n.id == line.from_node) {
        match resolve_edge_endpoint(node, line.from_dot) {
            Ok(p) => {
                line.from_x = p.x;
                line.from_y = p.y;
            }
            Err(err) => log::error!("line {}: {err}", line.id),
        }
    }
    if line.temp {
        return;
    }
    if let (Some(to), Some(dir)) = (line.to_node, line.to_dot) {
        if let Some(node) = nodes.iter().find(|n| n.id == to) {
            match resolve_edge_endpoint(node, dir) {
                Ok(p) => {
                    line.to_x = p.x;
                    line.to_y = p.y;
                }
                Err(err) => log::error!("line {}: {err}", line.id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_two_nodes() -> (GraphStore, NodeId, NodeId) {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Rect);
        let b = store.add_node(NodeType::Rect);
        (store, a, b)
    }

    #[test]
    fn add_node_staggers_and_activates() {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Rect);
        let b = store.add_node(NodeType::Circle);

        let na = store.node(a).unwrap();
        let nb = store.node(b).unwrap();
        assert_ne!((na.x, na.y), (nb.x, nb.y));
        assert_eq!(store.selection().active_node_id, Some(b));
        assert_eq!(store.active_node().map(|n| n.id), Some(b));
        assert_eq!(nb.status, NodeStatus::Active);
        assert_eq!(store.node(a).unwrap().status, NodeStatus::Normal);
        assert_eq!(store.history().past_len(), 2);
    }

    #[test]
    fn spawn_position_wraps() {
        let config = EditorConfig {
            spawn_wrap: 2,
            ..Default::default()
        };
        let mut store = GraphStore::new(config);
        let a = store.add_node(NodeType::Rect);
        store.add_node(NodeType::Rect);
        let c = store.add_node(NodeType::Rect);
        let (na, nc) = (store.node(a).unwrap(), store.node(c).unwrap());
        assert_eq!((na.x, na.y), (nc.x, nc.y));
    }

    #[test]
    fn update_node_pos_unknown_id_is_noop() {
        let (mut store, _, _) = store_with_two_nodes();
        let before = store.snapshot();
        assert!(!store.update_node_pos(Uuid::new_v4(), 1.0, 2.0));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn update_node_pos_does_not_record_history() {
        let (mut store, a, _) = store_with_two_nodes();
        let entries = store.history().past_len();
        assert!(store.update_node_pos(a, 5.0, 5.0));
        assert_eq!(store.history().past_len(), entries);
    }

    #[test]
    fn moving_a_node_moves_only_its_end() {
        let (mut store, a, b) = store_with_two_nodes();
        let id = store
            .add_line(Line::new(a, Direction::Right, b, Direction::Left))
            .unwrap();
        let to_before = {
            let l = store.line(id).unwrap();
            (l.to_x, l.to_y)
        };

        store.update_node_pos(a, 50.0, 60.0);

        let line = store.line(id).unwrap();
        let dot = *store.node(a).unwrap().dot(Direction::Right).unwrap();
        assert_eq!(line.from_x, 50.0 + dot.left);
        assert_eq!(line.from_y, 60.0 + dot.top);
        assert_eq!((line.to_x, line.to_y), to_before);
    }

    #[test]
    fn moving_destination_node_updates_to_end_with_its_own_dot() {
        let (mut store, a, b) = store_with_two_nodes();
        let id = store
            .add_line(Line::new(a, Direction::Bottom, b, Direction::Top))
            .unwrap();
        store.update_node_pos(b, 300.0, 400.0);

        let line = store.line(id).unwrap();
        let top = *store.node(b).unwrap().dot(Direction::Top).unwrap();
        assert_eq!((line.to_x, line.to_y), (300.0 + top.left, 400.0 + top.top));
    }

    #[test]
    fn self_loop_updates_both_ends() {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Rect);
        let id = store
            .add_line(Line::new(a, Direction::Left, a, Direction::Right))
            .unwrap();
        store.update_node_pos(a, 0.0, 0.0);

        let node = store.node(a).unwrap();
        let line = store.line(id).unwrap();
        let l = node.dot(Direction::Left).unwrap();
        let r = node.dot(Direction::Right).unwrap();
        assert_eq!((line.from_x, line.from_y), (l.left, l.top));
        assert_eq!((line.to_x, line.to_y), (r.left, r.top));
    }

    #[test]
    fn resize_recomputes_dots_and_lines() {
        let (mut store, a, b) = store_with_two_nodes();
        let id = store
            .add_line(Line::new(a, Direction::Right, b, Direction::Left))
            .unwrap();
        assert!(store.update_node_size(a, 200.0, 80.0));

        let node = store.node(a).unwrap();
        let r = *node.dot(Direction::Right).unwrap();
        assert_eq!(r.left, 200.0 - r.radius);
        assert_eq!(r.top, 40.0 - r.radius);
        let line = store.line(id).unwrap();
        assert_eq!((line.from_x, line.from_y), (node.x + r.left, node.y + r.top));
    }

    #[test]
    fn resize_keeps_square_shapes_square() {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Diamond);
        store.update_node_size(a, 90.0, 40.0);
        let node = store.node(a).unwrap();
        assert_eq!((node.width, node.height), (90.0, 90.0));
    }

    #[test]
    fn changing_type_recomputes_dots() {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Rect);
        assert!(store.update_node_type(a, NodeType::Circle));
        let node = store.node(a).unwrap();
        assert_eq!(node.node_type, NodeType::Circle);
        assert_eq!(node.width, node.height);
        let b = node.dot(Direction::Bottom).unwrap();
        assert_eq!(b.top, node.height - b.radius);
    }

    #[test]
    fn content_edit_is_undoable() {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Rect);
        let original = store.node(a).unwrap().content.clone();
        assert!(store.update_node_content(a, "Decision"));
        assert_eq!(store.node(a).unwrap().content, "Decision");
        store.undo();
        assert_eq!(store.node(a).unwrap().content, original);
    }

    #[test]
    fn unchanged_content_records_nothing() {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Rect);
        let content = store.node(a).unwrap().content.clone();
        let entries = store.history().past_len();
        store.update_node_content(a, content);
        assert_eq!(store.history().past_len(), entries);
    }

    #[test]
    fn remove_node_cascades_lines_and_clears_selection() {
        let (mut store, a, b) = store_with_two_nodes();
        let c = store.add_node(NodeType::Rect);
        let ab = store.add_line(Line::new(a, Direction::Right, b, Direction::Left)).unwrap();
        store.add_line(Line::new(b, Direction::Right, c, Direction::Left)).unwrap();
        let ac = store.add_line(Line::new(a, Direction::Bottom, c, Direction::Top)).unwrap();
        store.set_active_node_id(Some(b));
        store.set_active_line_id(Some(ab));

        assert!(store.remove_node(b));

        assert!(store.node(b).is_none());
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.lines()[0].id, ac);
        assert_eq!(store.selection().active_node_id, None);
        assert_eq!(store.selection().active_line_id, None);
        for line in store.lines() {
            assert!(store.node(line.from_node).is_some());
            assert!(store.node(line.to_node.unwrap()).is_some());
        }
    }

    #[test]
    fn remove_unknown_node_records_nothing() {
        let (mut store, _, _) = store_with_two_nodes();
        let entries = store.history().past_len();
        assert!(!store.remove_node(Uuid::new_v4()));
        assert_eq!(store.history().past_len(), entries);
    }

    #[test]
    fn copy_node_offsets_and_skips_lines() {
        let (mut store, a, b) = store_with_two_nodes();
        store.add_line(Line::new(a, Direction::Right, b, Direction::Left));
        let copy = store.copy_node(a).unwrap();

        let (orig, dup) = (store.node(a).unwrap(), store.node(copy).unwrap());
        assert_ne!(orig.id, dup.id);
        assert_eq!((dup.x, dup.y), (orig.x + 20.0, orig.y + 20.0));
        assert_eq!(dup.dots, orig.dots);
        assert_eq!(dup.content, orig.content);
        assert!(store.lines().iter().all(|l| !l.touches(copy)));
        assert_eq!(store.selection().active_node_id, Some(copy));
    }

    #[test]
    fn add_line_rejects_unknown_nodes() {
        let (mut store, a, _) = store_with_two_nodes();
        let entries = store.history().past_len();
        let line = Line::new(a, Direction::Right, Uuid::new_v4(), Direction::Left);
        assert!(store.add_line(line).is_none());
        assert!(store.lines().is_empty());
        assert_eq!(store.history().past_len(), entries);
    }

    #[test]
    fn update_line_unknown_id_is_noop() {
        let (mut store, _, _) = store_with_two_nodes();
        assert!(!store.update_line(Uuid::new_v4(), LinePatch::default()));
    }

    #[test]
    fn update_line_rewires_and_resolves() {
        let (mut store, a, b) = store_with_two_nodes();
        let id = store.add_line(Line::new(a, Direction::Right, b, Direction::Left)).unwrap();
        assert!(store.update_line(
            id,
            LinePatch {
                to_dot: Some(Direction::Bottom),
                ..Default::default()
            }
        ));
        let node = store.node(b).unwrap();
        let dot = node.dot(Direction::Bottom).unwrap();
        let line = store.line(id).unwrap();
        assert_eq!((line.to_x, line.to_y), (node.x + dot.left, node.y + dot.top));
    }

    #[test]
    fn remove_line_clears_active_line() {
        let (mut store, a, b) = store_with_two_nodes();
        let id = store.add_line(Line::new(a, Direction::Right, b, Direction::Left)).unwrap();
        store.set_active_line_id(Some(id));
        assert!(store.remove_line(id));
        assert!(store.active_line().is_none());
        assert!(!store.remove_line(id));
    }

    #[test]
    fn drawing_a_line() {
        let (mut store, a, b) = store_with_two_nodes();
        let entries = store.history().past_len();
        let id = store.begin_line(a, Direction::Right).unwrap();
        assert!(store.line(id).unwrap().temp);
        assert_eq!(store.history().past_len(), entries);

        assert!(store.drag_line_end(id, Point::new(400.0, 300.0)));
        let line = store.line(id).unwrap();
        assert_eq!((line.to_x, line.to_y), (400.0, 300.0));

        // Moving the source while drawing keeps the loose end where the pointer left it.
        store.update_node_pos(a, 10.0, 10.0);
        let line = store.line(id).unwrap();
        assert_eq!((line.to_x, line.to_y), (400.0, 300.0));

        assert!(store.commit_line(id, b, Direction::Left));
        let line = store.line(id).unwrap();
        assert!(!line.temp);
        let node = store.node(b).unwrap();
        let dot = node.dot(Direction::Left).unwrap();
        assert_eq!((line.to_x, line.to_y), (node.x + dot.left, node.y + dot.top));
        assert_eq!(store.history().past_len(), entries + 1);

        store.undo();
        assert!(store.lines().is_empty());
    }

    #[test]
    fn committing_onto_own_dot_discards() {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Rect);
        let id = store.begin_line(a, Direction::Top).unwrap();
        assert!(!store.commit_line(id, a, Direction::Top));
        assert!(store.lines().is_empty());
    }

    #[test]
    fn cancel_only_drops_temp_lines() {
        let (mut store, a, b) = store_with_two_nodes();
        let committed = store.add_line(Line::new(a, Direction::Right, b, Direction::Left)).unwrap();
        let drawing = store.begin_line(b, Direction::Bottom).unwrap();
        assert!(!store.cancel_line(committed));
        assert!(store.cancel_line(drawing));
        assert_eq!(store.lines().len(), 1);
    }

    #[test]
    fn hover_and_active_status() {
        let (mut store, a, b) = store_with_two_nodes();
        store.set_active_node_id(Some(a));
        store.set_mouse_on_node(Some(b));
        assert_eq!(store.node(a).unwrap().status, NodeStatus::Active);
        assert_eq!(store.node(b).unwrap().status, NodeStatus::Hover);
        assert_eq!(store.hover_node().map(|n| n.id), Some(b));

        store.set_mouse_on_node(Some(a));
        assert_eq!(store.node(a).unwrap().status, NodeStatus::Active);
        assert_eq!(store.node(b).unwrap().status, NodeStatus::Normal);

        let entries = store.history().past_len();
        store.set_mouse_on_dot(Some(HoverDot {
            node: a,
            dir: Direction::Left,
        }));
        assert_eq!(store.history().past_len(), entries);
    }

    #[test]
    fn clicks_in_diamond_corners_reach_the_node_below() {
        let mut store = GraphStore::default();
        let below = store.add_node(NodeType::Rect);
        store.update_node_pos(below, 0.0, 0.0);
        let diamond = store.add_node(NodeType::Diamond);
        store.update_node_pos(diamond, 0.0, 0.0);

        assert_eq!(store.node_at(Point::new(5.0, 5.0)), Some(below));
        assert_eq!(store.node_at(Point::new(60.0, 60.0)), Some(diamond));
    }

    #[test]
    fn hit_testing() {
        let mut store = GraphStore::default();
        let a = store.add_node(NodeType::Rect);
        store.update_node_pos(a, 0.0, 0.0);
        let b = store.add_node(NodeType::Rect);
        store.update_node_pos(b, 50.0, 0.0);

        assert_eq!(store.node_at(Point::new(60.0, 10.0)), Some(b));
        assert_eq!(store.node_at(Point::new(10.0, 10.0)), Some(a));
        assert_eq!(store.node_at(Point::new(-50.0, -50.0)), None);

        let left = store.node(a).unwrap().dot(Direction::Left).copied().unwrap();
        let center = Point::new(left.left + left.radius, left.top + left.radius);
        assert_eq!(
            store.dot_at(center),
            Some(HoverDot {
                node: a,
                dir: Direction::Left
            })
        );
    }

    #[test]
    fn line_hit_testing() {
        let (mut store, a, b) = store_with_two_nodes();
        store.update_node_pos(a, 0.0, 0.0);
        store.update_node_pos(b, 300.0, 0.0);
        let id = store.add_line(Line::new(a, Direction::Right, b, Direction::Left)).unwrap();
        let line = store.line(id).unwrap().clone();
        let mid = Point::new((line.from_x + line.to_x) / 2.0, (line.from_y + line.to_y) / 2.0);

        assert_eq!(store.line_at(mid, 6.0), Some(id));
        assert_eq!(store.line_at(Point::new(mid.x, mid.y + 20.0), 6.0), None);
    }

    #[test]
    fn load_repairs_document() {
        let mut source = GraphStore::default();
        let a = source.add_node(NodeType::Rect);
        let b = source.add_node(NodeType::Rect);
        source.add_line(Line::new(a, Direction::Right, b, Direction::Left));
        let mut snapshot = source.snapshot();
        snapshot.nodes[0].dots.clear();
        snapshot.lines.push(Line::new(a, Direction::Top, Uuid::new_v4(), Direction::Left));

        let mut store = GraphStore::default();
        store.load(snapshot);

        assert_eq!(store.nodes().len(), 2);
        assert_eq!(store.node(a).unwrap().dots.len(), 4);
        assert_eq!(store.lines().len(), 1);
        assert!(!store.can_undo());
    }
}
