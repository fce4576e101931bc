//! Acceptance Test Harness for TUI testing
//!
//! Wraps TuiApp<TestBackend> with methods that simulate what a viewer does:
//! press keys, click tiles, resize the terminal and let the scan timer fire.

use crate::config::keybindings::KeyBindings;
use crate::model::{ResolutionCatalog, TileSet};
use crate::state::GridController;
use crate::view::{GridOptions, GridSurface, TuiApp, TuiError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::time::Duration;

/// Convert a ratatui buffer to a string, one line per row.
///
/// Trailing blanks and empty rows are dropped.
fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Feed URLs `http://cam1/` .. `http://camN/`.
pub fn numbered_feeds(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("http://cam{}/", i)).collect()
}

/// Test harness for acceptance testing
pub struct AcceptanceTestHarness {
    app: TuiApp<TestBackend>,
    running: bool,
}

impl AcceptanceTestHarness {
    /// Grid of `num_tiles` numbered feeds on an 80x24 terminal.
    pub fn with_tiles(num_tiles: usize) -> Result<Self, TuiError> {
        Self::with_feeds_and_size(&numbered_feeds(num_tiles), 80, 24)
    }

    /// Grid of the given feeds on a terminal of the given size, default catalog.
    pub fn with_feeds_and_size(feeds: &[String], width: u16, height: u16) -> Result<Self, TuiError> {
        let tiles = TileSet::from_descriptors(feeds).expect("Harness needs at least one feed");
        let controller = GridController::new(tiles, ResolutionCatalog::default());
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        // Ticks are delivered by hand through `tick`
        let options = GridOptions {
            scan_interval: Duration::from_secs(3600),
            ..GridOptions::default()
        };

        let app = TuiApp::with_terminal(terminal, controller, KeyBindings::default(), options)?;
        Ok(Self { app, running: true })
    }

    /// Send a single key event
    ///
    /// Returns `true` if the app quit as a result of this key.
    pub fn send_key(&mut self, key: KeyCode) -> bool {
        self.send_key_with_mods(key, KeyModifiers::NONE)
    }

    /// Send key with modifiers (e.g., Ctrl+C)
    pub fn send_key_with_mods(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
        if !self.running {
            return true;
        }

        let quit = self.app.handle_key_test(KeyEvent::new(key, mods));
        if quit {
            self.running = false;
        }
        quit
    }

    /// Send a sequence of keys, stopping early on quit.
    pub fn send_keys(&mut self, keys: &[KeyCode]) {
        for key in keys {
            if self.send_key(*key) {
                break;
            }
        }
    }

    /// One scan timer interval elapses.
    pub fn tick(&mut self) {
        if self.running {
            self.app.scan_tick_test();
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.app.terminal_resize_test(width, height);
    }

    /// Left-click inside the area last drawn for `tile`.
    ///
    /// Renders first so tile areas are current.
    pub fn click_tile(&mut self, tile: usize) {
        let _ = self.app.render_test();
        let area = self
            .app
            .last_tile_areas()
            .iter()
            .find(|(t, _)| *t == tile)
            .map(|(_, area)| *area)
            .expect("Tile should be on screen");
        self.click_at(area.x + area.width / 2, area.y + area.height / 2);
    }

    /// Send a left mouse button press at the specified coordinates
    pub fn click_at(&mut self, column: u16, row: u16) {
        if !self.running {
            return;
        }

        let _ = self.app.render_test();
        self.app.handle_mouse_test(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    pub fn controller(&self) -> &GridController {
        self.app.controller()
    }

    pub fn surface(&self) -> &GridSurface {
        self.app.surface()
    }

    pub fn is_scan_timer_running(&self) -> bool {
        self.app.is_scan_timer_running()
    }

    /// Check if app is still running (didn't quit)
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Render the current frame and return the buffer as text.
    pub fn render_to_string(&mut self) -> String {
        self.app
            .render_test()
            .expect("Rendering should succeed in test harness");
        buffer_to_string(self.app.terminal().backend().buffer())
    }
}
