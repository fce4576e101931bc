//! Grid controller: selection/scan state machine and layout change detection.
//!
//! The controller owns all mutable view state. Events come in through
//! [`GridController::dispatch`]; the result is the list of render commands
//! needed to bring the surface up to date. Nothing here performs I/O.
//!
//! # State Machine
//!
//! | selected  | scanning | mode               |
//! |-----------|----------|--------------------|
//! | `None`    | `false`  | Grid               |
//! | `None`    | `true`   | GridScanning       |
//! | `Some(i)` | `false`  | Fullscreen         |
//! | `Some(i)` | `true`   | FullscreenScanning |
//!
//! # Resolution Policy
//!
//! A tile requests the full-screen resolution when scanning is on or when
//! it is the selected tile, and the grid-cell resolution otherwise. While
//! scanning any tile may be shown full-screen next, so prefetching at the
//! larger size avoids restarting its stream.
//!
//! # Change Detection
//!
//! A recompute caches the grid shape, both resolutions and both scale rules,
//! and emits commands only for values that differ from the cache. Repeating
//! an image request for the URL already displayed is suppressed per tile.

use crate::layout;
use crate::model::{
    Constraint, ContainerSize, Covering, FeedUrlBuilder, GridShape, Resolution,
    ResolutionCatalog, TileSet, UrlTemplate,
};
use crate::state::command::{ImageSlot, RenderCommand, ScaleScope};
use crate::state::event::GridEvent;
use crate::state::tile_image::{ImageUpdate, TileImage};
use tracing::{debug, info, warn};

/// Coarse view mode derived from `(selected, scanning)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// All tiles in the grid, not scanning.
    Grid,
    /// Scanning with nothing selected; the next selection starts the cycle.
    GridScanning,
    /// One tile full-screen, not scanning.
    Fullscreen(usize),
    /// One tile full-screen, advancing on every tick.
    FullscreenScanning(usize),
}

/// Mutable view state, owned exclusively by [`GridController`].
///
/// Only readable from outside (via [`GridController::view_state`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Full-screen tile. Always a valid tile index.
    pub selected: Option<usize>,
    /// Auto-advance selection on every scan tick.
    pub scanning: bool,
    /// Last container measured by a recompute pass.
    pub container: Option<ContainerSize>,
    /// Solved grid for `container`.
    pub shape: Option<GridShape>,
    /// Resolution requested for tiles in their grid cells.
    pub tile_resolution: Option<Covering>,
    /// Resolution requested for full-screen and scanned tiles.
    pub fullscreen_resolution: Option<Covering>,
    /// Binding axis of a grid cell.
    pub constraint: Option<Constraint>,
    /// Binding axis of a single tile filling the container.
    pub container_constraint: Option<Constraint>,
}

impl ViewState {
    /// Named state for `(selected, scanning)`.
    pub fn mode(&self) -> ViewMode {
        match (self.selected, self.scanning) {
            (None, false) => ViewMode::Grid,
            (None, true) => ViewMode::GridScanning,
            (Some(i), false) => ViewMode::Fullscreen(i),
            (Some(i), true) => ViewMode::FullscreenScanning(i),
        }
    }
}

/// Orchestrates layout, resolution choice and the selection/scan state machine.
pub struct GridController {
    tiles: TileSet,
    catalog: ResolutionCatalog,
    url_builder: Box<dyn FeedUrlBuilder>,
    state: ViewState,
    images: Vec<TileImage>,
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("tiles", &self.tiles)
            .field("catalog", &self.catalog)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl GridController {
    /// Controller using the default MJPEG URL template.
    pub fn new(tiles: TileSet, catalog: ResolutionCatalog) -> Self {
        Self::with_url_builder(tiles, catalog, UrlTemplate::default())
    }

    /// Controller with a custom feed URL scheme.
    pub fn with_url_builder(
        tiles: TileSet,
        catalog: ResolutionCatalog,
        url_builder: impl FeedUrlBuilder + 'static,
    ) -> Self {
        let images = vec![TileImage::default(); tiles.len()];
        Self {
            tiles,
            catalog,
            url_builder: Box::new(url_builder),
            state: ViewState::default(),
            images,
        }
    }

    /// The fixed tile set.
    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Number of tiles.
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Current view state (read-only).
    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    /// Full-screen tile, if any.
    pub fn selected(&self) -> Option<usize> {
        self.state.selected
    }

    /// Whether scan ticks advance the selection.
    pub fn is_scanning(&self) -> bool {
        self.state.scanning
    }

    /// Named state for the current selection and scanning flag.
    pub fn mode(&self) -> ViewMode {
        self.state.mode()
    }

    /// Image bookkeeping for a tile.
    pub fn image(&self, tile: usize) -> Option<&TileImage> {
        self.images.get(tile)
    }

    /// Resolution a tile should currently be requested at, once layout is known.
    pub fn resolution_for(&self, tile: usize) -> Option<Resolution> {
        let covering = if self.uses_fullscreen_resolution(tile) {
            self.state.fullscreen_resolution
        } else {
            self.state.tile_resolution
        };
        covering.map(|c| c.resolution)
    }

    fn uses_fullscreen_resolution(&self, tile: usize) -> bool {
        self.state.scanning || self.state.selected == Some(tile)
    }

    /// Single entry point: apply an event and return the resulting render commands.
    pub fn dispatch(&mut self, event: GridEvent) -> Vec<RenderCommand> {
        let mut out = Vec::new();
        match event {
            GridEvent::Resize(container) => self.recompute(container, &mut out),
            GridEvent::SelectTile(index) => self.toggle_selection(index, &mut out),
            GridEvent::SelectAndStopScan(index) => {
                self.toggle_selection(index, &mut out);
                self.set_scanning(false, &mut out);
            }
            GridEvent::DismissSelection => {
                if let Some(index) = self.state.selected {
                    self.toggle_selection(index, &mut out);
                    self.set_scanning(false, &mut out);
                }
            }
            GridEvent::StartScanning => self.enter_scanning(&mut out),
            GridEvent::StopScanning => self.set_scanning(false, &mut out),
            GridEvent::ToggleScanning => {
                let scanning = !self.state.scanning;
                self.set_scanning(scanning, &mut out);
            }
            GridEvent::ScanShortcut => {
                if self.state.scanning && self.state.selected.is_some() {
                    self.set_scanning(false, &mut out);
                } else {
                    self.enter_scanning(&mut out);
                }
            }
            GridEvent::ScanTick => self.scan_step(&mut out),
            GridEvent::ScanPrevious => {
                let target = match self.state.selected {
                    Some(index) => (index + self.num_tiles() - 1) % self.num_tiles(),
                    None => self.num_tiles() - 1,
                };
                self.set_selection(Some(target), &mut out);
                self.set_scanning(false, &mut out);
            }
            GridEvent::ScanNext => {
                let target = match self.state.selected {
                    Some(index) => (index + 1) % self.num_tiles(),
                    None => 0,
                };
                self.set_selection(Some(target), &mut out);
                self.set_scanning(false, &mut out);
            }
            GridEvent::ImageLoaded { tile, slot } => self.image_loaded(tile, slot, &mut out),
        }
        out
    }

    /// Recompute layout and resolutions for a new container.
    pub fn resize(&mut self, container: ContainerSize) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::Resize(container))
    }

    /// Toggle full-screen selection of a tile.
    pub fn select_tile(&mut self, index: usize) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::SelectTile(index))
    }

    /// Toggle selection, then stop scanning.
    pub fn select_and_stop_scan(&mut self, index: usize) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::SelectAndStopScan(index))
    }

    /// Leave full-screen and stop scanning; no-op without a selection.
    pub fn dismiss_selection(&mut self) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::DismissSelection)
    }

    /// Start scanning, selecting tile 0 if nothing is selected.
    pub fn start_scanning(&mut self) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::StartScanning)
    }

    /// Stop scanning; tiles fall back to the grid resolution.
    pub fn stop_scanning(&mut self) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::StopScanning)
    }

    /// Flip the scanning flag without forcing a selection.
    pub fn toggle_scanning(&mut self) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::ToggleScanning)
    }

    /// One timer interval elapsed.
    pub fn scan_tick(&mut self) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::ScanTick)
    }

    /// Select the previous tile, wrapping, and stop scanning.
    pub fn scan_previous(&mut self) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::ScanPrevious)
    }

    /// Select the next tile, wrapping, and stop scanning.
    pub fn scan_next(&mut self) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::ScanNext)
    }

    /// The image layer finished loading `slot` of `tile`.
    pub fn image_loaded_at(&mut self, tile: usize, slot: ImageSlot) -> Vec<RenderCommand> {
        self.dispatch(GridEvent::ImageLoaded { tile, slot })
    }

    // ===== Transitions =====

    fn toggle_selection(&mut self, index: usize, out: &mut Vec<RenderCommand>) {
        if !self.tiles.contains_index(index) {
            warn!(
                index,
                num_tiles = self.num_tiles(),
                "Ignoring selection of tile outside the tile set"
            );
            return;
        }
        let target = if self.state.selected == Some(index) {
            None
        } else {
            Some(index)
        };
        self.set_selection(target, out);
    }

    /// Move the full-screen marker. Does not toggle: selecting the current
    /// tile again is a no-op, which keeps single-tile scanning on tile 0.
    fn set_selection(&mut self, target: Option<usize>, out: &mut Vec<RenderCommand>) {
        if self.state.selected == target {
            return;
        }
        let previous = std::mem::replace(&mut self.state.selected, target);
        debug!(?previous, ?target, "Selection changed");

        if let Some(tile) = previous {
            out.push(RenderCommand::SetFullscreen {
                tile,
                fullscreen: false,
            });
        }
        if let Some(tile) = target {
            out.push(RenderCommand::SetFullscreen {
                tile,
                fullscreen: true,
            });
        }
        self.refresh_images(out);
    }

    fn enter_scanning(&mut self, out: &mut Vec<RenderCommand>) {
        self.set_scanning(true, out);
        if self.state.selected.is_none() {
            self.set_selection(Some(0), out);
        }
    }

    fn set_scanning(&mut self, scanning: bool, out: &mut Vec<RenderCommand>) {
        if self.state.scanning == scanning {
            return;
        }
        self.state.scanning = scanning;
        debug!(scanning, "Scanning changed");
        self.refresh_images(out);
    }

    /// Ticks only advance a selected tile. [`ViewMode::GridScanning`] stays
    /// put on a tick rather than promoting to full-screen; see the mode table on [`ViewMode`].
    fn scan_step(&mut self, out: &mut Vec<RenderCommand>) {
        if !self.state.scanning {
            return;
        }
        if let Some(index) = self.state.selected {
            let next = (index + 1) % self.num_tiles();
            self.set_selection(Some(next), out);
        }
    }

    fn image_loaded(&mut self, tile: usize, slot: ImageSlot, out: &mut Vec<RenderCommand>) {
        let Some(image) = self.images.get_mut(tile) else {
            warn!(tile, "Load notification for unknown tile");
            return;
        };
        if let Some(old) = image.loaded(slot) {
            out.push(RenderCommand::DiscardImage { tile, slot: old });
        }
    }

    // ===== Recompute pass =====

    fn recompute(&mut self, container: ContainerSize, out: &mut Vec<RenderCommand>) {
        let (aspect_w, aspect_h) = self.catalog.aspect();
        let solution = match layout::solve(container, self.num_tiles(), aspect_w, aspect_h) {
            Ok(solution) => solution,
            Err(err) => {
                debug!(%err, "Skipping layout for undrawable container");
                return;
            }
        };
        let shape = solution.shape;
        let tile_resolution = self
            .catalog
            .smallest_covering(shape.cell_width_px, shape.cell_height_px);
        let fullscreen_resolution = self
            .catalog
            .smallest_covering(container.width, container.height);

        self.state.container = Some(container);

        // Grid structure and cell box
        let previous_shape = self.state.shape.replace(shape);
        let rebuild = previous_shape.is_none_or(|old| !old.same_structure(&shape));
        if rebuild {
            info!(
                columns = shape.columns,
                rows = shape.rows,
                "Rebuilding grid structure"
            );
            out.push(RenderCommand::EnsureCells {
                count: self.num_tiles(),
            });
            for tile in 0..self.num_tiles() {
                let (column, row) = shape.position_of(tile);
                out.push(RenderCommand::PlaceCell { tile, column, row });
            }
        }
        if previous_shape != Some(shape) {
            out.push(RenderCommand::LayoutGrid { shape });
        }

        // Scale rules
        let previous_grid_rule = self
            .state
            .constraint
            .zip(self.state.tile_resolution.map(|c| c.upscaled));
        let grid_rule = (shape.constraint, tile_resolution.upscaled);
        if previous_grid_rule != Some(grid_rule) {
            out.push(RenderCommand::SetScaleRule {
                scope: ScaleScope::Grid,
                constraint: grid_rule.0,
                upscale: grid_rule.1,
            });
        }

        let previous_fullscreen_rule = self
            .state
            .container_constraint
            .zip(self.state.fullscreen_resolution.map(|c| c.upscaled));
        let fullscreen_rule = (solution.container_constraint, fullscreen_resolution.upscaled);
        if previous_fullscreen_rule != Some(fullscreen_rule) {
            out.push(RenderCommand::SetScaleRule {
                scope: ScaleScope::Fullscreen,
                constraint: fullscreen_rule.0,
                upscale: fullscreen_rule.1,
            });
        }
        self.state.constraint = Some(shape.constraint);
        self.state.container_constraint = Some(solution.container_constraint);

        // Resolutions
        let previous_tile = self.state.tile_resolution.replace(tile_resolution);
        let previous_fullscreen = self
            .state
            .fullscreen_resolution
            .replace(fullscreen_resolution);
        if previous_tile != Some(tile_resolution)
            || previous_fullscreen != Some(fullscreen_resolution)
        {
            info!(
                grid = %tile_resolution.resolution,
                fullscreen = %fullscreen_resolution.resolution,
                "Feed resolutions changed"
            );
            self.refresh_images(out);
        }
    }

    /// Request every tile at the resolution the policy assigns it.
    ///
    /// Tiles whose URL is unchanged produce no command.
    fn refresh_images(&mut self, out: &mut Vec<RenderCommand>) {
        for tile in 0..self.num_tiles() {
            let Some(resolution) = self.resolution_for(tile) else {
                return;
            };
            let Some(id) = self.tiles.get(tile) else {
                continue;
            };
            let url = self.url_builder.build(id, resolution);
            match self.images[tile].request(&url) {
                ImageUpdate::Unchanged => {}
                ImageUpdate::Request(slot) => {
                    debug!(tile, %url, ?slot, "Requesting feed image");
                    out.push(RenderCommand::RequestImage { tile, slot, url });
                }
                ImageUpdate::CancelPending(slot) => {
                    out.push(RenderCommand::DiscardImage { tile, slot });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
