//! Front-end state.
//!
//! The diagram itself lives in the [`Editor`]; this module only holds what the
//! egui front end needs between frames: edit buffers, touch points and the
//! pointer capture flag.

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::history::Snapshot;
use crate::types::NodeId;
use eframe::egui;
use std::collections::BTreeMap;

/// Key under which the diagram document is persisted in eframe storage.
pub const STORAGE_KEY: &str = "diagram";

/// Temporary values for the properties panel, loaded when the active node changes.
#[derive(Debug, Default)]
pub struct PropertyBuffers {
    /// Node whose values are loaded in the buffers
    pub node: Option<NodeId>,
    /// Label being edited
    pub content: String,
    /// Width being edited
    pub width: f32,
    /// Height being edited
    pub height: f32,
}

/// The egui application wrapping an [`Editor`].
pub struct DiagramApp {
    /// The engine being driven by this front end
    pub editor: Editor,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Properties panel edit buffers
    pub properties: PropertyBuffers,
    /// Whether the primary button was pressed on the canvas and not yet released
    pub pointer_captured: bool,
    /// Active touch points in screen space, ordered by touch id
    pub touches: BTreeMap<egui::TouchId, egui::Pos2>,
}

impl Default for DiagramApp {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl DiagramApp {
    /// Creates an app around an empty editor.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            editor: Editor::new(config),
            dark_mode: true,
            properties: PropertyBuffers::default(),
            pointer_captured: false,
            touches: BTreeMap::new(),
        }
    }

    /// Creates the app, restoring the last saved document if there is one.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let mut app = Self::with_config(config);
        if let Some(json) = cc.storage.and_then(|s| s.get_string(STORAGE_KEY)) {
            if let Err(err) = app.load_json(&json) {
                log::warn!("Failed to restore saved diagram: {err}");
            }
        }
        app
    }

    /// Replaces the diagram with a JSON document.
    pub fn load_json(&mut self, json: &str) -> Result<(), crate::error::GraphError> {
        let snapshot = Snapshot::from_json(json)?;
        self.editor.release();
        self.editor.store_mut().load(snapshot);
        self.properties = PropertyBuffers::default();
        Ok(())
    }

    /// Serializes the committed diagram to JSON.
    pub fn to_json(&self) -> Result<String, crate::error::GraphError> {
        self.editor.store().snapshot().to_json()
    }

    /// Reloads the property buffers if the active node changed.
    pub fn sync_property_buffers(&mut self) {
        let active = self.editor.store().active_node();
        let active_id = active.map(|n| n.id);
        if active_id == self.properties.node {
            return;
        }
        self.properties = match active {
            Some(node) => PropertyBuffers {
                node: Some(node.id),
                content: node.content.clone(),
                width: node.width,
                height: node.height,
            },
            None => PropertyBuffers::default(),
        };
    }
}
