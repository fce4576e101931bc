//! Pure glue between the terminal shell and the grid controller.
//!
//! Key actions become grid events, terminal cell counts become pixel
//! containers, and a resolved configuration becomes a controller. Nothing
//! here touches the terminal, so all of it is testable without one.

use crate::config::ResolvedConfig;
use crate::model::{AppError, ContainerSize, KeyAction, ResolutionCatalog, TileSet, UrlTemplate};
use crate::state::{GridController, GridEvent};
use crate::view::GridOptions;
use tracing::info;

/// Validate the configured feeds, catalog and URL template and build the controller.
///
/// # Errors
///
/// Any invalid piece is a fatal configuration error.
pub fn controller_from_config(config: &ResolvedConfig) -> Result<GridController, AppError> {
    let tiles = TileSet::from_descriptors(&config.feeds)?;
    let catalog = ResolutionCatalog::from_pairs(&config.resolutions)?;
    let template = UrlTemplate::new(config.url_template.clone())?;

    info!(
        tiles = tiles.len(),
        tiers = catalog.entries().len(),
        template = template.as_str(),
        "Grid controller configured"
    );
    Ok(GridController::with_url_builder(tiles, catalog, template))
}

/// Terminal shell settings from the resolved configuration.
pub fn grid_options_from_config(config: &ResolvedConfig) -> GridOptions {
    GridOptions {
        scan_interval: config.scan_interval,
        cell_pixels: config.cell_pixels,
    }
}

/// Translate a bound key action into a grid event.
///
/// Returns `None` for actions the controller does not handle (quit) and for
/// tile digits beyond the number of tiles.
pub fn event_for_action(action: KeyAction, num_tiles: usize) -> Option<GridEvent> {
    match action {
        KeyAction::SelectTile(index) if index < num_tiles => {
            Some(GridEvent::SelectAndStopScan(index))
        }
        KeyAction::SelectTile(_) => None,
        KeyAction::DismissSelection => Some(GridEvent::DismissSelection),
        KeyAction::ScanShortcut => Some(GridEvent::ScanShortcut),
        KeyAction::ToggleScanning => Some(GridEvent::ToggleScanning),
        KeyAction::ScanPrevious => Some(GridEvent::ScanPrevious),
        KeyAction::ScanNext => Some(GridEvent::ScanNext),
        KeyAction::Quit => None,
    }
}

/// Pixel size of a terminal area, given the pixel size of one cell.
pub fn container_from_terminal(columns: u16, rows: u16, cell_pixels: [u32; 2]) -> ContainerSize {
    ContainerSize::new(
        f64::from(columns) * f64::from(cell_pixels[0]),
        f64::from(rows) * f64::from(cell_pixels[1]),
    )
}

/// Whole terminal cells covered by a pixel extent. At least one.
pub fn cells_for_pixels(pixels: f64, cell_pixel: u32) -> u16 {
    if cell_pixel == 0 || !pixels.is_finite() {
        return 1;
    }
    let cells = (pixels / f64::from(cell_pixel)).floor();
    // Float-to-int `as` saturates
    (cells as u16).max(1)
}
