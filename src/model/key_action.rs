//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Selection
    /// Select tile by 0-based index and stop scanning. Default: 1-9, 0 (tile 10)
    SelectTile(usize),
    /// Leave full-screen and stop scanning. Default: Esc
    DismissSelection,

    // Scanning
    /// Stop if scanning a selected tile, otherwise start scanning. Default: s
    ScanShortcut,
    /// Flip the scanning flag without touching the selection. Default: Space
    ToggleScanning,
    /// Step selection backwards and stop scanning. Default: ←
    ScanPrevious,
    /// Step selection forwards and stop scanning. Default: →
    ScanNext,

    // Application
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_tile_compares_by_index() {
        assert_eq!(KeyAction::SelectTile(2), KeyAction::SelectTile(2));
        assert_ne!(KeyAction::SelectTile(2), KeyAction::SelectTile(3));
    }

    #[test]
    fn actions_are_hashable_for_binding_maps() {
        use std::collections::HashSet;

        let set: HashSet<KeyAction> = [
            KeyAction::ScanShortcut,
            KeyAction::ToggleScanning,
            KeyAction::ScanShortcut,
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2, "Duplicate actions should collapse in a set");
    }
}
