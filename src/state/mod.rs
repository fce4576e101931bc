//! Grid view state machine (pure).
//!
//! All state transitions are pure functions over in-memory state, testable
//! without a terminal. The controller answers every event with render
//! commands; applying them is the view's job.

pub mod command;
pub mod controller;
pub mod event;
pub mod mouse_handler;
pub mod scan_timer;
pub mod tile_image;

// Re-export for convenience
pub use command::{ImageSlot, RenderCommand, ScaleScope};
pub use controller::{GridController, ViewMode, ViewState};
pub use event::GridEvent;
pub use mouse_handler::{detect_tile_click, TileClickResult};
pub use scan_timer::{ScanTimer, DEFAULT_SCAN_INTERVAL};
pub use tile_image::{ImageUpdate, TileImage};
