//! Typed events consumed by [`GridController::dispatch`].
//!
//! [`GridController::dispatch`]: crate::state::GridController::dispatch

use crate::model::ContainerSize;
use crate::state::command::ImageSlot;

/// Everything that can change grid view state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// Container resized (or first measured): run the recompute pass.
    Resize(ContainerSize),
    /// Toggle full-screen selection of a tile (pointer click).
    SelectTile(usize),
    /// Toggle selection, then stop scanning (digit keys).
    SelectAndStopScan(usize),
    /// Leave full-screen and stop scanning.
    DismissSelection,
    /// Start scanning, selecting tile 0 if nothing is selected.
    StartScanning,
    /// Stop scanning, keeping the selection.
    StopScanning,
    /// Flip the scanning flag only.
    ToggleScanning,
    /// Stop if scanning a selected tile, otherwise start scanning.
    ScanShortcut,
    /// Periodic timer tick.
    ScanTick,
    /// Select the previous tile and stop scanning (Left).
    ScanPrevious,
    /// Select the next tile and stop scanning (Right).
    ScanNext,
    /// Image layer finished loading a slot.
    ImageLoaded {
        /// Tile index.
        tile: usize,
        /// Buffer that finished loading.
        slot: ImageSlot,
    },
}
