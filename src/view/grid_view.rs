//! Grid drawing.
//!
//! Reads the surface (what the controller told it) and the controller's view
//! state (for the status line) and paints bordered tiles. Each tile shows the
//! feed URL currently in its visible image slot.

use crate::integration::cells_for_pixels;
use crate::state::{GridController, ViewMode};
use crate::view::surface::GridSurface;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const KEY_HINTS: &str = "1-9,0 tile | s scan | space toggle | \u{2190}/\u{2192} step | esc back | q quit";

/// Screen regions of a drawn frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAreas {
    /// Area the tiles are laid out in.
    pub grid: Rect,
    /// One-line status bar at the bottom.
    pub status: Rect,
}

/// Split the frame into the grid area and a one-line status bar.
pub fn frame_areas(frame_area: Rect) -> FrameAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame_area);
    FrameAreas {
        grid: chunks[0],
        status: chunks[1],
    }
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('\u{2026}');
    out
}

fn to_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Terminal rectangles of every visible tile, in tile order.
///
/// In full-screen mode the selected tile covers the whole grid area.
/// Otherwise cells are sized from the surface's grid shape and the grid is
/// centred in `area`.
pub fn tile_areas(surface: &GridSurface, area: Rect, cell_pixels: [u32; 2]) -> Vec<(usize, Rect)> {
    if let Some(tile) = surface.fullscreen_tile() {
        return vec![(tile, area)];
    }
    let Some(shape) = surface.shape() else {
        return Vec::new();
    };

    let cell_w = cells_for_pixels(shape.cell_width_px, cell_pixels[0]);
    let cell_h = cells_for_pixels(shape.cell_height_px, cell_pixels[1]);
    let grid_w = cell_w.saturating_mul(to_u16(shape.columns)).min(area.width);
    let grid_h = cell_h.saturating_mul(to_u16(shape.rows)).min(area.height);
    let origin_x = area.x + (area.width - grid_w) / 2;
    let origin_y = area.y + (area.height - grid_h) / 2;

    surface
        .cells()
        .iter()
        .enumerate()
        .filter_map(|(tile, cell)| {
            let (column, row) = cell.position?;
            let rect = Rect::new(
                origin_x.saturating_add(cell_w.saturating_mul(to_u16(column))),
                origin_y.saturating_add(cell_h.saturating_mul(to_u16(row))),
                cell_w,
                cell_h,
            )
            .intersection(area);
            (!rect.is_empty()).then_some((tile, rect))
        })
        .collect()
}

fn mode_label(mode: ViewMode) -> String {
    match mode {
        ViewMode::Grid => "GRID".to_string(),
        ViewMode::GridScanning => "GRID [SCAN]".to_string(),
        ViewMode::Fullscreen(tile) => format!("TILE {}", tile + 1),
        ViewMode::FullscreenScanning(tile) => format!("TILE {} [SCAN]", tile + 1),
    }
}

/// Status line text: mode, grid shape and both requested resolutions.
pub fn status_text(controller: &GridController) -> String {
    let state = controller.view_state();
    let mut parts = vec![mode_label(state.mode())];

    if let (Some(shape), Some(tile_res)) = (state.shape.as_ref(), state.tile_resolution.as_ref()) {
        parts.push(format!(
            "{}x{} @ {}{}",
            shape.columns,
            shape.rows,
            tile_res.resolution,
            if tile_res.upscaled { " (upscaled)" } else { "" }
        ));
    }
    if let Some(full) = state.fullscreen_resolution.as_ref() {
        parts.push(format!(
            "full {}{}",
            full.resolution,
            if full.upscaled { " (upscaled)" } else { "" }
        ));
    }
    parts.push(KEY_HINTS.to_string());
    parts.join(" | ")
}

fn render_tile(
    frame: &mut Frame,
    area: Rect,
    tile: usize,
    controller: &GridController,
    surface: &GridSurface,
) {
    let selected = controller.selected() == Some(tile);
    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let inner_width = usize::from(area.width.saturating_sub(2));
    let name = controller
        .tiles()
        .get(tile)
        .map(|id| id.as_str())
        .unwrap_or("?");
    let title = truncate_to_width(&format!(" {} {} ", tile + 1, name), inner_width);

    let mut lines = Vec::new();
    match surface.cell(tile).and_then(|cell| cell.visible_url()) {
        Some(url) => lines.push(Line::from(truncate_to_width(url, inner_width))),
        None => lines.push(Line::from("no image").style(Style::default().fg(Color::DarkGray))),
    }
    if let Some(resolution) = controller.resolution_for(tile) {
        lines.push(Line::from(resolution.to_string()).style(Style::default().fg(Color::Cyan)));
    }
    if controller.image(tile).is_some_and(|image| image.is_loading()) {
        lines.push(Line::from("loading").style(Style::default().fg(Color::DarkGray)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the grid (or the full-screen tile) and the status bar.
///
/// Returns the tile rectangles for click detection.
pub fn render_grid(
    frame: &mut Frame,
    controller: &GridController,
    surface: &GridSurface,
    cell_pixels: [u32; 2],
) -> Vec<(usize, Rect)> {
    let areas = frame_areas(frame.area());
    let tiles = tile_areas(surface, areas.grid, cell_pixels);

    for &(tile, area) in &tiles {
        render_tile(frame, area, tile, controller, surface);
    }

    let status_style = if controller.is_scanning() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Gray)
    };
    let status = truncate_to_width(
        &status_text(controller),
        usize::from(areas.status.width),
    );
    frame.render_widget(Paragraph::new(Line::from(status)).style(status_style), areas.status);

    tiles
}

#[cfg(test)]
#[path = "grid_view_tests.rs"]
mod tests;
