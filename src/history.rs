//! Snapshot-based undo/redo history.
//!
//! Every undoable edit records a full, independent copy of the diagram before it
//! mutates anything. Undo and redo swap the live diagram with the top of the
//! respective stack.

use crate::constants::MAX_UNDO_HISTORY;
use crate::error::GraphError;
use crate::types::{Line, Node, NodeStatus};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// An owned copy of the diagram's nodes and committed lines.
///
/// Transient data is normalised away on capture: every node is stored with
/// `Normal` status and lines still being drawn are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All nodes, in insertion order
    pub nodes: Vec<Node>,
    /// All committed lines, in insertion order
    pub lines: Vec<Line>,
}

impl Snapshot {
    /// Deep-copies the given nodes and lines.
    pub fn capture(nodes: &[Node], lines: &[Line]) -> Self {
        let nodes = nodes
            .iter()
            .map(|n| Node {
                status: NodeStatus::Normal,
                ..n.clone()
            })
            .collect();
        let lines = lines.iter().filter(|l| !l.temp).cloned().collect();
        Self { nodes, lines }
    }

    /// Serialize the snapshot to a JSON string
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Linear undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots that can be restored by undo, oldest first
    past: VecDeque<Snapshot>,
    /// Snapshots that can be restored by redo, most recently undone last
    future: Vec<Snapshot>,
    /// Maximum number of entries kept in `past`
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Creates an empty history retaining at most `limit` undo entries.
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Records the state preceding an edit.
    ///
    /// This clears the redo stack since a new edit invalidates anything previously undone.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.push_past(snapshot);
        self.future.clear();
    }

    /// Steps back one entry.
    ///
    /// `current` is stored for redo; the returned snapshot should replace the
    /// live diagram. Returns `None` (and stores nothing) when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Steps forward one entry; the mirror image of [`History::undo`].
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.push_past(current);
        Some(next)
    }

    /// Returns true if there are entries that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns true if there are entries that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo entries.
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redo entries.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Clears all undo and redo history.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn push_past(&mut self, snapshot: Snapshot) {
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}
