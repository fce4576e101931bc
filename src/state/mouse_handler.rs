//! Mouse click hit-testing.
//!
//! Pure functions that map a click position to the tile drawn under it.

use ratatui::layout::Rect;

/// Result of detecting which tile was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileClickResult {
    /// Click landed on the tile at this index
    TileClicked(usize),
    /// Click was outside every tile
    NoTile,
}

/// Whether a terminal position lies inside a rectangle.
fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x
        && y >= area.y
        && u32::from(x) < u32::from(area.x) + u32::from(area.width)
        && u32::from(y) < u32::from(area.y) + u32::from(area.height)
}

/// Detect which tile (if any) was clicked.
///
/// # Arguments
/// * `click_x` - Mouse click column position (0-based)
/// * `click_y` - Mouse click row position (0-based)
/// * `tile_areas` - Last drawn area of each visible tile, topmost last
///
/// # Behavior
/// - Later entries win when areas overlap (a full-screen tile is drawn last)
/// - Returns NoTile for clicks on gaps between tiles
pub fn detect_tile_click(click_x: u16, click_y: u16, tile_areas: &[(usize, Rect)]) -> TileClickResult {
    tile_areas
        .iter()
        .rev()
        .find(|(_, area)| contains(*area, click_x, click_y))
        .map_or(TileClickResult::NoTile, |(tile, _)| {
            TileClickResult::TileClicked(*tile)
        })
}
