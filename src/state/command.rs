//! Render directives emitted by the grid controller.
//!
//! The controller never draws. Every observable side effect is one of these
//! commands, applied in order by whatever rendering surface hosts the grid.

use crate::model::{Constraint, GridShape};

/// Which set of styling rules a scale command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleScope {
    /// Tiles drawn in their grid cells.
    Grid,
    /// The selected tile drawn over the whole container.
    Fullscreen,
}

/// One of the two image buffers each tile owns.
///
/// A new image loads into the back slot while the front slot keeps showing
/// the previous one; the swap happens on the loaded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    /// First buffer; used for a tile's very first image.
    Front,
    /// Second buffer.
    Back,
}

impl ImageSlot {
    /// The opposite buffer.
    pub fn other(self) -> Self {
        match self {
            ImageSlot::Front => ImageSlot::Back,
            ImageSlot::Back => ImageSlot::Front,
        }
    }
}

/// A single instruction for the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Ensure this many tile cells exist.
    EnsureCells {
        /// Cell count, one per tile.
        count: usize,
    },
    /// Put a tile's cell at a grid position.
    PlaceCell {
        /// Tile index.
        tile: usize,
        /// Zero-based column.
        column: u32,
        /// Zero-based row.
        row: u32,
    },
    /// Grid dimensions or cell box changed.
    LayoutGrid {
        /// New grid shape.
        shape: GridShape,
    },
    /// Scale rule for a scope: which axis binds, and whether images are stretched
    /// beyond their native resolution.
    SetScaleRule {
        /// Grid cells or the full-screen tile.
        scope: ScaleScope,
        /// Axis the image fills.
        constraint: Constraint,
        /// Image is smaller than its box and must be stretched.
        upscale: bool,
    },
    /// Mark or unmark a tile as the full-screen one.
    SetFullscreen {
        /// Tile index.
        tile: usize,
        /// `true` to show full-screen, `false` to return it to its cell.
        fullscreen: bool,
    },
    /// Load an image URL into a tile slot.
    RequestImage {
        /// Tile index.
        tile: usize,
        /// Hidden buffer to load into.
        slot: ImageSlot,
        /// Feed URL.
        url: String,
    },
    /// Drop a slot's image once its replacement has loaded.
    DiscardImage {
        /// Tile index.
        tile: usize,
        /// Buffer to clear.
        slot: ImageSlot,
    },
}

impl RenderCommand {
    /// Whether this command starts a network fetch.
    pub fn is_image_request(&self) -> bool {
        matches!(self, RenderCommand::RequestImage { .. })
    }
}
