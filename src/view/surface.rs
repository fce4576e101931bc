//! Terminal rendering surface.
//!
//! Applies [`RenderCommand`]s to an in-memory picture of the grid that the
//! drawing code reads. There is no network fetch behind an image request:
//! the URL lands in its slot at once and the surface reports it loaded, so
//! the controller sees the same request/loaded/discard cycle a real image
//! layer would produce.

use crate::model::{Constraint, GridShape};
use crate::state::{GridEvent, ImageSlot, RenderCommand, ScaleScope};
use tracing::{debug, trace};

/// Scale rule most recently applied to a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleRule {
    /// Axis the image fills.
    pub constraint: Constraint,
    /// Image is stretched beyond its native size.
    pub upscale: bool,
}

/// One tile's drawable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceCell {
    /// Grid position `(column, row)`, once placed.
    pub position: Option<(u32, u32)>,
    front: Option<String>,
    back: Option<String>,
    visible: Option<ImageSlot>,
}

impl SurfaceCell {
    fn slot_mut(&mut self, slot: ImageSlot) -> &mut Option<String> {
        match slot {
            ImageSlot::Front => &mut self.front,
            ImageSlot::Back => &mut self.back,
        }
    }

    fn slot(&self, slot: ImageSlot) -> Option<&str> {
        match slot {
            ImageSlot::Front => self.front.as_deref(),
            ImageSlot::Back => self.back.as_deref(),
        }
    }

    /// URL of the image currently on screen.
    pub fn visible_url(&self) -> Option<&str> {
        self.visible.and_then(|slot| self.slot(slot))
    }

    /// Number of slots holding an image.
    pub fn loaded_slots(&self) -> usize {
        usize::from(self.front.is_some()) + usize::from(self.back.is_some())
    }
}

/// In-memory grid that render commands are applied to.
#[derive(Debug, Clone, Default)]
pub struct GridSurface {
    cells: Vec<SurfaceCell>,
    shape: Option<GridShape>,
    grid_rule: Option<ScaleRule>,
    fullscreen_rule: Option<ScaleRule>,
    fullscreen: Option<usize>,
}

impl GridSurface {
    /// Empty surface; the first resize builds its cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// All cells, indexed by tile.
    pub fn cells(&self) -> &[SurfaceCell] {
        &self.cells
    }

    /// Cell of one tile.
    pub fn cell(&self, tile: usize) -> Option<&SurfaceCell> {
        self.cells.get(tile)
    }

    /// Last applied grid shape.
    pub fn shape(&self) -> Option<&GridShape> {
        self.shape.as_ref()
    }

    /// Last applied scale rule for a scope.
    pub fn scale_rule(&self, scope: ScaleScope) -> Option<ScaleRule> {
        match scope {
            ScaleScope::Grid => self.grid_rule,
            ScaleScope::Fullscreen => self.fullscreen_rule,
        }
    }

    /// Tile drawn over the whole container, if any.
    pub fn fullscreen_tile(&self) -> Option<usize> {
        self.fullscreen
    }

    /// Apply commands in order.
    ///
    /// Returns the loaded notifications for every image request, to be fed
    /// back into the controller.
    pub fn apply(&mut self, commands: &[RenderCommand]) -> Vec<GridEvent> {
        let mut loaded = Vec::new();
        for command in commands {
            trace!(?command, "Applying render command");
            if let Some(event) = self.apply_one(command) {
                loaded.push(event);
            }
        }
        loaded
    }

    fn apply_one(&mut self, command: &RenderCommand) -> Option<GridEvent> {
        match command {
            RenderCommand::EnsureCells { count } => {
                if self.cells.len() < *count {
                    self.cells.resize_with(*count, SurfaceCell::default);
                }
                None
            }
            RenderCommand::PlaceCell { tile, column, row } => {
                self.cell_mut(*tile).position = Some((*column, *row));
                None
            }
            RenderCommand::LayoutGrid { shape } => {
                debug!(
                    columns = shape.columns,
                    rows = shape.rows,
                    "Surface grid laid out"
                );
                self.shape = Some(*shape);
                None
            }
            RenderCommand::SetScaleRule {
                scope,
                constraint,
                upscale,
            } => {
                let rule = Some(ScaleRule {
                    constraint: *constraint,
                    upscale: *upscale,
                });
                match scope {
                    ScaleScope::Grid => self.grid_rule = rule,
                    ScaleScope::Fullscreen => self.fullscreen_rule = rule,
                }
                None
            }
            RenderCommand::SetFullscreen { tile, fullscreen } => {
                if *fullscreen {
                    self.fullscreen = Some(*tile);
                } else if self.fullscreen == Some(*tile) {
                    self.fullscreen = None;
                }
                None
            }
            RenderCommand::RequestImage { tile, slot, url } => {
                let cell = self.cell_mut(*tile);
                *cell.slot_mut(*slot) = Some(url.clone());
                // Loads complete instantly; the new slot goes on screen now.
                cell.visible = Some(*slot);
                Some(GridEvent::ImageLoaded {
                    tile: *tile,
                    slot: *slot,
                })
            }
            RenderCommand::DiscardImage { tile, slot } => {
                let cell = self.cell_mut(*tile);
                *cell.slot_mut(*slot) = None;
                if cell.visible == Some(*slot) {
                    cell.visible = Some(slot.other()).filter(|other| cell.slot(*other).is_some());
                }
                None
            }
        }
    }

    fn cell_mut(&mut self, tile: usize) -> &mut SurfaceCell {
        if tile >= self.cells.len() {
            self.cells.resize_with(tile + 1, SurfaceCell::default);
        }
        &mut self.cells[tile]
    }
}
