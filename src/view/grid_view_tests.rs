//! Tests for grid drawing.

use super::*;
use crate::integration::container_from_terminal;
use crate::model::{ResolutionCatalog, TileSet};
use crate::state::GridEvent;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

// ===== Test Helpers =====

const CELL_PIXELS: [u32; 2] = [8, 16];

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

/// Controller and surface after the first resize, with every image acknowledged.
fn laid_out(num_tiles: usize) -> (GridController, GridSurface) {
    let feeds: Vec<String> = (1..=num_tiles).map(|i| format!("http://c{}/", i)).collect();
    let tiles = TileSet::from_descriptors(&feeds).unwrap();
    let mut controller = GridController::new(tiles, ResolutionCatalog::default());
    let mut surface = GridSurface::new();

    let grid = frame_areas(Rect::new(0, 0, 80, 24)).grid;
    feed(
        &mut controller,
        &mut surface,
        GridEvent::Resize(container_from_terminal(grid.width, grid.height, CELL_PIXELS)),
    );
    (controller, surface)
}

fn feed(controller: &mut GridController, surface: &mut GridSurface, event: GridEvent) {
    let mut pending = vec![event];
    while let Some(event) = pending.pop() {
        let commands = controller.dispatch(event);
        pending.extend(surface.apply(&commands));
    }
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer().clone();
    buffer.content.iter().map(|c| c.symbol()).collect::<String>()
}

// ===== truncate_to_width =====

#[test]
fn truncate_leaves_short_text_alone() {
    assert_eq!(truncate_to_width("http://c1/", 20), "http://c1/");
    assert_eq!(truncate_to_width("exact", 5), "exact");
}

#[test]
fn truncate_marks_cut_with_ellipsis() {
    assert_eq!(truncate_to_width("http://camera/", 8), "http://\u{2026}");
}

#[test]
fn truncate_counts_wide_characters_as_two_columns() {
    // Each CJK character is two columns wide
    let out = truncate_to_width("\u{76e3}\u{8996}\u{30ab}\u{30e1}\u{30e9}", 6);
    assert_eq!(out, "\u{76e3}\u{8996}\u{2026}");
}

#[test]
fn truncate_to_zero_is_empty() {
    assert_eq!(truncate_to_width("anything", 0), "");
}

// ===== tile_areas =====

#[test]
fn no_areas_before_first_layout() {
    let surface = GridSurface::new();
    assert!(tile_areas(&surface, Rect::new(0, 0, 80, 23), CELL_PIXELS).is_empty());
}

#[test]
fn every_tile_gets_an_area_inside_the_grid() {
    let (_, surface) = laid_out(4);
    let grid = Rect::new(0, 0, 80, 23);
    let areas = tile_areas(&surface, grid, CELL_PIXELS);

    assert_eq!(areas.len(), 4, "One area per tile");
    for (tile, area) in &areas {
        assert_eq!(
            area.intersection(grid),
            *area,
            "Tile {} area {:?} should lie inside the grid",
            tile,
            area
        );
    }
}

#[test]
fn tile_areas_do_not_overlap() {
    let (_, surface) = laid_out(5);
    let areas = tile_areas(&surface, Rect::new(0, 0, 80, 23), CELL_PIXELS);

    for (i, (_, a)) in areas.iter().enumerate() {
        for (_, b) in areas.iter().skip(i + 1) {
            assert!(!a.intersects(*b), "{:?} overlaps {:?}", a, b);
        }
    }
}

#[test]
fn fullscreen_tile_covers_whole_grid() {
    let (mut controller, mut surface) = laid_out(4);
    feed(&mut controller, &mut surface, GridEvent::SelectTile(2));

    let grid = Rect::new(0, 0, 80, 23);
    assert_eq!(tile_areas(&surface, grid, CELL_PIXELS), vec![(2, grid)]);
}

// ===== status_text =====

#[test]
fn status_reports_grid_mode_and_resolutions() {
    let (controller, _) = laid_out(4);
    let status = status_text(&controller);

    assert!(status.starts_with("GRID"), "got: {}", status);
    assert!(status.contains("full "), "got: {}", status);
}

#[test]
fn status_reports_scanning_tile_one_based() {
    let (mut controller, mut surface) = laid_out(4);
    feed(&mut controller, &mut surface, GridEvent::StartScanning);

    assert!(
        status_text(&controller).starts_with("TILE 1 [SCAN]"),
        "got: {}",
        status_text(&controller)
    );
}

// ===== render_grid =====

#[test]
fn render_grid_draws_tile_titles_and_status() {
    let mut terminal = create_test_terminal();
    let (controller, surface) = laid_out(4);

    let mut areas = Vec::new();
    terminal
        .draw(|frame| {
            areas = render_grid(frame, &controller, &surface, CELL_PIXELS);
        })
        .unwrap();

    let content = buffer_text(&terminal);
    assert_eq!(areas.len(), 4);
    assert!(content.contains(" 1 http://c1/ "), "Tile 1 title missing");
    assert!(content.contains(" 4 http://c4/ "), "Tile 4 title missing");
    assert!(content.contains("GRID"), "Status bar missing");
}

#[test]
fn render_grid_shows_requested_url() {
    let mut terminal = create_test_terminal();
    let (mut controller, mut surface) = laid_out(2);
    feed(&mut controller, &mut surface, GridEvent::SelectTile(0));

    terminal
        .draw(|frame| {
            render_grid(frame, &controller, &surface, CELL_PIXELS);
        })
        .unwrap();

    let content = buffer_text(&terminal);
    let url = surface
        .cell(0)
        .and_then(|cell| cell.visible_url())
        .expect("Tile 0 has an image")
        .to_string();
    assert!(
        content.contains(&url),
        "Full-screen tile should show its whole URL {}",
        url
    );
    assert!(content.contains("TILE 1"), "Status shows the full-screen tile");
}
