//! # Diagram Editor
//!
//! An interactive node-and-line diagram editor. The library is the diagram
//! state and interaction engine:
//! - **Geometry**: connection-dot offsets per node shape and line endpoint resolution
//! - **Graph store**: nodes, lines, selection, and the mutations that keep lines attached
//! - **History**: snapshot-based linear undo/redo
//! - **Viewport**: pan, wheel zoom and pinch zoom of an infinite canvas
//!
//! An egui front end that drives the engine is included and started with [`run_app`].
//!
//! ## Example
//!
//! ```
//! use diagram_editor::{Direction, GraphStore, Line, NodeType};
//!
//! let mut store = GraphStore::default();
//! let a = store.add_node(NodeType::Rect);
//! let b = store.add_node(NodeType::Diamond);
//! store.add_line(Line::new(a, Direction::Right, b, Direction::Left));
//!
//! store.update_node_pos(a, 50.0, 60.0);
//! let line = &store.lines()[0];
//! let dot = store.node(a).unwrap().dot(Direction::Right).unwrap();
//! assert_eq!(line.from_x, 50.0 + dot.left);
//!
//! store.remove_node(b);
//! assert!(store.lines().is_empty());
//! store.undo();
//! assert_eq!(store.lines().len(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
mod config;
mod editor;
mod error;
mod geometry;
mod history;
mod store;
mod types;
mod ui;
mod viewport;

// Re-export public types and functions
pub use config::EditorConfig;
pub use editor::*;
pub use error::GraphError;
pub use geometry::*;
pub use history::*;
pub use store::GraphStore;
pub use types::*;
pub use ui::DiagramApp;
pub use viewport::*;

/// Runs the diagram editor application.
///
/// The configuration is read from the JSON file named by the
/// `DIAGRAM_EDITOR_CONFIG` environment variable, falling back to defaults.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     diagram_editor::run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let config = load_config();
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Diagram Editor",
        options,
        Box::new(move |cc| Ok(Box::new(DiagramApp::new(cc, config)))),
    )
}

fn load_config() -> EditorConfig {
    let Ok(path) = std::env::var("DIAGRAM_EDITOR_CONFIG") else {
        return EditorConfig::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|json| EditorConfig::from_json(&json).map_err(|err| err.to_string()));
    match parsed {
        Ok(config) => {
            log::info!("Loaded config from {path}");
            config
        }
        Err(err) => {
            log::warn!("Ignoring config {path}: {err}");
            EditorConfig::default()
        }
    }
}
