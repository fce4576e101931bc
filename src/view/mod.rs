//! TUI rendering and terminal management (impure shell)

pub mod grid_view;
pub mod surface;

pub use grid_view::{render_grid, status_text, tile_areas, truncate_to_width};
pub use surface::{GridSurface, ScaleRule, SurfaceCell};

use crate::config::keybindings::KeyBindings;
use crate::config::loader::DEFAULT_CELL_PIXELS;
use crate::integration;
use crate::model::KeyAction;
use crate::state::{
    detect_tile_click, GridController, GridEvent, ScanTimer, TileClickResult,
    DEFAULT_SCAN_INTERVAL,
};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// How long the event loop waits for terminal input before checking the scan timer.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Settings the terminal shell needs beyond the controller itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    /// Interval between automatic scan steps.
    pub scan_interval: Duration,
    /// Pixel size of one terminal cell, `[width, height]`.
    pub cell_pixels: [u32; 2],
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            scan_interval: DEFAULT_SCAN_INTERVAL,
            cell_pixels: DEFAULT_CELL_PIXELS,
        }
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    controller: GridController,
    surface: GridSurface,
    key_bindings: KeyBindings,
    options: GridOptions,
    /// Running only while the controller is scanning.
    scan_timer: Option<ScanTimer>,
    /// Tile rectangles from the last frame (for mouse click detection)
    last_tile_areas: Vec<(usize, Rect)>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(controller: GridController, options: GridOptions) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Self::with_terminal(terminal, controller, KeyBindings::default(), options)
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Redraws on input, resize and
    /// scan steps only.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            if event::poll(INPUT_POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    _ => continue,
                }
                self.draw()?;
                continue;
            }

            if self.handle_scan_ticks() > 0 {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Build the app on an existing terminal and lay out the grid for its size.
    pub fn with_terminal(
        terminal: Terminal<B>,
        controller: GridController,
        key_bindings: KeyBindings,
        options: GridOptions,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        let mut app = Self {
            terminal,
            controller,
            surface: GridSurface::new(),
            key_bindings,
            options,
            scan_timer: None,
            last_tile_areas: Vec::new(),
        };
        app.handle_resize(size.width, size.height);
        Ok(app)
    }

    /// Dispatch an event and apply the resulting commands.
    ///
    /// Loaded notifications from the surface are fed back until the
    /// controller has nothing more to say.
    fn apply_event(&mut self, event: GridEvent) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            let commands = self.controller.dispatch(event);
            pending.extend(self.surface.apply(&commands));
        }
        self.sync_scan_timer();
    }

    /// Start the scan timer when scanning begins and drop it when scanning ends,
    /// so every scan session starts with a full interval.
    fn sync_scan_timer(&mut self) {
        match (self.controller.is_scanning(), self.scan_timer.is_some()) {
            (true, false) => {
                self.scan_timer = Some(ScanTimer::start(self.options.scan_interval));
            }
            (false, true) => {
                self.scan_timer = None;
            }
            _ => {}
        }
    }

    /// Turn elapsed timer ticks into scan steps. Returns the number of ticks.
    fn handle_scan_ticks(&mut self) -> usize {
        let ticks = self
            .scan_timer
            .as_ref()
            .map_or(0, |timer| timer.drain_ticks());
        for _ in 0..ticks {
            self.apply_event(GridEvent::ScanTick);
        }
        ticks
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        if action == KeyAction::Quit {
            info!("Quit requested");
            return true;
        }

        match integration::event_for_action(action, self.controller.num_tiles()) {
            Some(event) => self.apply_event(event),
            None => debug!(?action, "Key action has no grid event"),
        }
        false
    }

    /// Handle a single mouse event
    ///
    /// A left click on a tile toggles its full-screen selection.
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        if let TileClickResult::TileClicked(tile) =
            detect_tile_click(mouse.column, mouse.row, &self.last_tile_areas)
        {
            self.apply_event(GridEvent::SelectTile(tile));
        }
    }

    /// Handle a terminal resize event
    ///
    /// The container is the grid area (terminal minus the status bar) in pixels.
    fn handle_resize(&mut self, width: u16, height: u16) {
        debug!("Handling resize to {}x{}", width, height);
        let grid = grid_view::frame_areas(Rect::new(0, 0, width, height)).grid;
        let container =
            integration::container_from_terminal(grid.width, grid.height, self.options.cell_pixels);
        self.apply_event(GridEvent::Resize(container));
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let controller = &self.controller;
        let surface = &self.surface;
        let cell_pixels = self.options.cell_pixels;
        let mut tile_areas = Vec::new();

        self.terminal.draw(|frame| {
            tile_areas = render_grid(frame, controller, surface, cell_pixels);
        })?;

        self.last_tile_areas = tile_areas;
        Ok(())
    }
}

// ===== Test Helpers =====

#[cfg(test)]
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    pub(crate) fn controller(&self) -> &GridController {
        &self.controller
    }

    pub(crate) fn surface(&self) -> &GridSurface {
        &self.surface
    }

    pub(crate) fn last_tile_areas(&self) -> &[(usize, Rect)] {
        &self.last_tile_areas
    }

    pub(crate) fn is_scan_timer_running(&self) -> bool {
        self.scan_timer.is_some()
    }

    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> bool {
        self.handle_key(key)
    }

    pub(crate) fn handle_mouse_test(&mut self, mouse: MouseEvent) {
        self.handle_mouse(mouse)
    }

    /// Deliver one timer tick without waiting for the real interval.
    pub(crate) fn scan_tick_test(&mut self) {
        self.apply_event(GridEvent::ScanTick)
    }

    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

#[cfg(test)]
impl TuiApp<ratatui::backend::TestBackend> {
    /// Resize the test terminal and deliver the resize event.
    pub(crate) fn terminal_resize_test(&mut self, width: u16, height: u16) {
        self.terminal.backend_mut().resize(width, height);
        self.handle_resize(width, height);
    }
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// on exit, including when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(controller: GridController, options: GridOptions) -> Result<(), TuiError> {
    let result = TuiApp::new(controller, options).and_then(|mut app| app.run());

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResolutionCatalog, TileSet};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;

    #[test]
    fn tui_error_from_io_error() {
        let io_err = io::Error::other("test error");
        let tui_err: TuiError = io_err.into();
        assert!(matches!(tui_err, TuiError::Io(_)));
    }

    // Helper to create test TuiApp
    fn create_test_app(num_tiles: usize) -> TuiApp<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let feeds: Vec<String> = (1..=num_tiles).map(|i| format!("http://cam{}/", i)).collect();
        let controller = GridController::new(
            TileSet::from_descriptors(&feeds).unwrap(),
            ResolutionCatalog::default(),
        );
        // Long interval: tests drive ticks by hand
        let options = GridOptions {
            scan_interval: Duration::from_secs(3600),
            ..GridOptions::default()
        };
        TuiApp::with_terminal(terminal, controller, KeyBindings::default(), options).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn construction_lays_out_grid_for_terminal_size() {
        let app = create_test_app(4);
        assert!(
            app.controller.view_state().shape.is_some(),
            "Grid should be solved on construction"
        );
        assert_eq!(app.surface.cells().len(), 4);
        assert!(
            app.surface
                .cells()
                .iter()
                .all(|cell| cell.visible_url().is_some()),
            "Every tile should show an image after construction"
        );
    }

    #[test]
    fn handle_key_q_returns_true() {
        let mut app = create_test_app(4);
        assert!(app.handle_key(key(KeyCode::Char('q'))), "'q' should trigger quit");
    }

    #[test]
    fn handle_key_ctrl_c_returns_true() {
        let mut app = create_test_app(4);
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(event), "Ctrl+C should trigger quit");
    }

    #[test]
    fn handle_key_other_returns_false() {
        let mut app = create_test_app(4);
        assert!(!app.handle_key(key(KeyCode::Char('x'))));
        assert_eq!(app.controller.selected(), None);
    }

    #[test]
    fn handle_key_ignores_release_events() {
        let mut app = create_test_app(4);
        let mut event = key(KeyCode::Char('2'));
        event.kind = KeyEventKind::Release;
        app.handle_key(event);
        assert_eq!(app.controller.selected(), None);
    }

    #[test]
    fn handle_key_digit_selects_tile() {
        let mut app = create_test_app(4);
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.controller.selected(), Some(1));
        assert_eq!(app.surface.fullscreen_tile(), Some(1));
    }

    #[test]
    fn handle_key_digit_beyond_tiles_is_ignored() {
        let mut app = create_test_app(4);
        app.handle_key(key(KeyCode::Char('7')));
        assert_eq!(app.controller.selected(), None);
    }

    #[test]
    fn handle_key_escape_returns_to_grid() {
        let mut app = create_test_app(4);
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.controller.selected(), None);
        assert_eq!(app.surface.fullscreen_tile(), None);
    }

    #[test]
    fn scan_timer_follows_scanning_flag() {
        let mut app = create_test_app(4);
        assert!(app.scan_timer.is_none());

        app.handle_key(key(KeyCode::Char('s')));
        assert!(app.controller.is_scanning());
        assert!(app.scan_timer.is_some(), "Scanning should start the timer");

        app.handle_key(key(KeyCode::Char('s')));
        assert!(!app.controller.is_scanning());
        assert!(app.scan_timer.is_none(), "Stopping should drop the timer");
    }

    #[test]
    fn handle_scan_ticks_without_timer_is_zero() {
        let mut app = create_test_app(4);
        assert_eq!(app.handle_scan_ticks(), 0);
    }

    #[test]
    fn click_on_tile_enters_fullscreen() {
        let mut app = create_test_app(4);
        app.draw().unwrap();

        let (tile, area) = app.last_tile_areas[3];
        app.handle_mouse(left_click(area.x + 1, area.y + 1));

        assert_eq!(app.controller.selected(), Some(tile));
    }

    #[test]
    fn click_on_fullscreen_tile_returns_to_grid() {
        let mut app = create_test_app(4);
        app.handle_key(key(KeyCode::Char('1')));
        app.draw().unwrap();

        app.handle_mouse(left_click(10, 5));
        assert_eq!(app.controller.selected(), None);
    }

    #[test]
    fn right_click_is_ignored() {
        let mut app = create_test_app(4);
        app.draw().unwrap();

        let (_, area) = app.last_tile_areas[0];
        let mut mouse = left_click(area.x + 1, area.y + 1);
        mouse.kind = MouseEventKind::Down(MouseButton::Right);
        app.handle_mouse(mouse);
        assert_eq!(app.controller.selected(), None);
    }

    #[test]
    fn resize_relayouts_grid() {
        let mut app = create_test_app(4);
        let before = app.controller.view_state().shape;

        app.handle_resize(200, 20);
        let after = app.controller.view_state().shape;

        assert_ne!(before, after, "A very wide terminal should change the grid");
    }

    #[test]
    fn draw_renders_without_error() {
        let mut app = create_test_app(4);
        assert!(app.draw().is_ok());
    }
}
