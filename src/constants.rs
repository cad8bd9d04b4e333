//! Shared application-wide constants.
//! Centralizes tweakable default values used by the engine and the front end.

// Connection dots
/// Radius of a connection dot (half of its rendered diameter), in graph units.
pub const DOT_RADIUS: f32 = 7.0;

// Node dimensions
/// Default node width in graph units.
pub const NODE_WIDTH: f32 = 120.0;
/// Default node height in graph units.
pub const NODE_HEIGHT: f32 = 60.0;

// Node placement
/// Graph position of the first node created with `add_node`.
pub const SPAWN_ORIGIN: (f32, f32) = (100.0, 100.0);
/// Diagonal step applied per existing node so repeated adds do not overlap exactly.
pub const SPAWN_STEP: f32 = 30.0;
/// Number of steps after which the spawn cascade wraps back to the origin.
pub const SPAWN_WRAP: usize = 10;
/// Offset applied in both axes when a node is copied.
pub const COPY_OFFSET: f32 = 20.0;

// Hit testing
/// Maximum distance (graph units) from a line at which a click selects it.
pub const LINE_HIT_TOLERANCE: f32 = 6.0;

// Viewport
/// Smallest allowed zoom factor.
pub const MIN_SCALE: f32 = 0.5;
/// Largest allowed zoom factor.
pub const MAX_SCALE: f32 = 2.0;
/// Relative scale change per wheel notch.
pub const ZOOM_SPEED: f32 = 0.1;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 100;
