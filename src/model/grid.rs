//! Grid geometry value types.

use std::fmt;

/// Which axis limits the scale when fitting a fixed-aspect box into a target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Width binds; the box fills the target horizontally.
    Width,
    /// Height binds; the box fills the target vertically.
    Height,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Width => f.write_str("width"),
            Constraint::Height => f.write_str("height"),
        }
    }
}

/// Container dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ContainerSize {
    /// Container of the given pixel size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Chosen grid layout: integer shape plus the per-cell pixel box.
///
/// Derived from the container on every recompute; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridShape {
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Axis that limits the cell size.
    pub constraint: Constraint,
    /// Cell width in pixels.
    pub cell_width_px: f64,
    /// Cell height in pixels.
    pub cell_height_px: f64,
}

impl GridShape {
    /// Total cells, `columns * rows`.
    pub fn cell_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Whether two shapes need the same cell structure (positions).
    pub fn same_structure(&self, other: &GridShape) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }

    /// Grid position `(column, row)` of a tile index, filled row-major.
    pub fn position_of(&self, index: usize) -> (u32, u32) {
        let columns = self.columns as usize;
        ((index % columns) as u32, (index / columns) as u32)
    }
}

/// Output of the layout solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSolution {
    /// Winning grid.
    pub shape: GridShape,
    /// Binding axis for a single tile filling the whole container.
    pub container_constraint: Constraint,
}
