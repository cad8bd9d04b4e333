//! Editor configuration.
//!
//! All values default to the ones in [`crate::constants`]; a JSON document only
//! needs to name the fields it wants to override.

use crate::constants::*;
use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// Tunable parameters for the graph store and the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest allowed zoom factor
    pub min_scale: f32,
    /// Largest allowed zoom factor
    pub max_scale: f32,
    /// Relative scale change per wheel notch
    pub zoom_speed: f32,
    /// Radius of the connection dots drawn on node boundaries
    pub dot_radius: f32,
    /// Width of newly added nodes
    pub node_width: f32,
    /// Height of newly added nodes
    pub node_height: f32,
    /// Position of the first added node
    pub spawn_origin: (f32, f32),
    /// Diagonal offset per existing node for newly added nodes
    pub spawn_step: f32,
    /// Number of nodes after which the spawn cascade restarts at the origin
    pub spawn_wrap: usize,
    /// Offset applied in both axes to copied nodes
    pub copy_offset: f32,
    /// Maximum number of undo snapshots retained
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_speed: ZOOM_SPEED,
            dot_radius: DOT_RADIUS,
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            spawn_origin: SPAWN_ORIGIN,
            spawn_step: SPAWN_STEP,
            spawn_wrap: SPAWN_WRAP,
            copy_offset: COPY_OFFSET,
            history_limit: MAX_UNDO_HISTORY,
        }
    }
}

impl EditorConfig {
    /// Parses a config from JSON and normalises it.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Serialize the config to a JSON string
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Repairs out-of-range values instead of rejecting them.
    ///
    /// Non-positive scale bounds fall back to the defaults, swapped bounds are
    /// reordered, and a zero spawn wrap or history limit is raised to one.
    pub fn normalized(mut self) -> Self {
        if !(self.min_scale > 0.0) {
            log::warn!("min_scale {} is not positive, using {MIN_SCALE}", self.min_scale);
            self.min_scale = MIN_SCALE;
        }
        if !(self.max_scale > 0.0) {
            log::warn!("max_scale {} is not positive, using {MAX_SCALE}", self.max_scale);
            self.max_scale = MAX_SCALE;
        }
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        if !(self.zoom_speed > 0.0) {
            self.zoom_speed = ZOOM_SPEED;
        }
        self.dot_radius = self.dot_radius.max(0.0);
        self.spawn_wrap = self.spawn_wrap.max(1);
        self.history_limit = self.history_limit.max(1);
        self
    }
}
