//! Grid layout solver (pure).
//!
//! Chooses how many columns and rows to split a container into so that a
//! fixed number of fixed-aspect tiles is drawn as large as possible.
//!
//! # Algorithm
//!
//! The continuous optimum for `n` unit tiles is
//! `rows = sqrt(scale_factor * n)`, `cols = sqrt(n / scale_factor)` where
//! `scale_factor` compares how many tiles fit vertically versus
//! horizontally. Three integer neighbours of that optimum are tried, in a
//! fixed order:
//!
//! 1. `(ceil cols, floor rows)`
//! 2. `(floor cols, ceil rows)`
//! 3. `(ceil cols, ceil rows)`
//!
//! Candidates that cannot seat every tile are dropped. The survivor with the
//! largest tile scale wins; equal scales prefer fewer cells, and remaining
//! ties keep generation order. The third candidate always seats every tile,
//! so a solution exists for any valid input.

use crate::model::{Constraint, ContainerSize, GridShape, GridSolution};
use thiserror::Error;

/// Invalid solver inputs.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LayoutError {
    /// The tile count is zero.
    #[error("Cannot lay out zero tiles")]
    NoTiles,

    /// Container width or height is zero, negative or not finite.
    #[error("Container {width}x{height} has no drawable area")]
    EmptyContainer {
        /// Container width in pixels.
        width: f64,
        /// Container height in pixels.
        height: f64,
    },

    /// Tile aspect ratio is not positive and finite.
    #[error("Tile aspect {width}:{height} must be positive")]
    InvalidAspect {
        /// Aspect width term.
        width: f64,
        /// Aspect height term.
        height: f64,
    },

    /// No candidate has enough cells.
    #[error("No candidate grid seats {num_tiles} tiles")]
    NoFeasibleShape {
        /// Tiles that needed seating.
        num_tiles: usize,
    },
}

/// One integer grid considered by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Tile scale (rendered pixels per aspect unit); zero when infeasible.
    pub scale: f64,
    /// Axis that limits the scale.
    pub constraint: Constraint,
    /// Whether every tile gets a cell.
    pub feasible: bool,
}

impl Candidate {
    /// Total cells, `columns * rows`.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

/// Ratio of tiles fitting vertically to tiles fitting horizontally.
fn scale_factor(container: ContainerSize, aspect_w: f64, aspect_h: f64) -> f64 {
    (container.height / aspect_h) / (container.width / aspect_w)
}

/// Clamp a float grid dimension into `u32`. Floors at zero.
fn to_dimension(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

fn validate(
    container: ContainerSize,
    num_tiles: usize,
    aspect_w: f64,
    aspect_h: f64,
) -> Result<(), LayoutError> {
    if num_tiles == 0 {
        return Err(LayoutError::NoTiles);
    }
    if !container.is_drawable() {
        return Err(LayoutError::EmptyContainer {
            width: container.width,
            height: container.height,
        });
    }
    if !(aspect_w.is_finite() && aspect_h.is_finite() && aspect_w > 0.0 && aspect_h > 0.0) {
        return Err(LayoutError::InvalidAspect {
            width: aspect_w,
            height: aspect_h,
        });
    }
    Ok(())
}

/// The three candidate grids, in generation order, with their scores.
///
/// # Errors
///
/// Returns [`LayoutError`] for zero tiles, an undrawable container, or a
/// non-positive aspect ratio.
pub fn candidates(
    container: ContainerSize,
    num_tiles: usize,
    aspect_w: f64,
    aspect_h: f64,
) -> Result<[Candidate; 3], LayoutError> {
    validate(container, num_tiles, aspect_w, aspect_h)?;

    let n = num_tiles as f64;
    let factor = scale_factor(container, aspect_w, aspect_h);
    let ideal_rows = (factor * n).sqrt();
    let ideal_cols = (n / factor).sqrt();

    let shapes = [
        (ideal_cols.ceil(), ideal_rows.floor()),
        (ideal_cols.floor(), ideal_rows.ceil()),
        (ideal_cols.ceil(), ideal_rows.ceil()),
    ];

    Ok(shapes.map(|(cols, rows)| {
        let columns = to_dimension(cols);
        let rows = to_dimension(rows);
        score(container, num_tiles, aspect_w, aspect_h, columns, rows)
    }))
}

fn score(
    container: ContainerSize,
    num_tiles: usize,
    aspect_w: f64,
    aspect_h: f64,
    columns: u32,
    rows: u32,
) -> Candidate {
    let cells = u64::from(columns) * u64::from(rows);
    if cells < num_tiles as u64 {
        return Candidate {
            columns,
            rows,
            scale: 0.0,
            constraint: Constraint::Width,
            feasible: false,
        };
    }

    let width_scale = (container.width / f64::from(columns)) / aspect_w;
    let height_scale = (container.height / f64::from(rows)) / aspect_h;
    let (scale, constraint) = if width_scale <= height_scale {
        (width_scale, Constraint::Width)
    } else {
        (height_scale, Constraint::Height)
    };

    Candidate {
        columns,
        rows,
        scale,
        constraint,
        feasible: true,
    }
}

/// Compute the optimal grid for `num_tiles` tiles of aspect `aspect_w:aspect_h`.
///
/// # Errors
///
/// Returns [`LayoutError`] when the inputs cannot be laid out at all.
pub fn solve(
    container: ContainerSize,
    num_tiles: usize,
    aspect_w: f64,
    aspect_h: f64,
) -> Result<GridSolution, LayoutError> {
    let candidates = candidates(container, num_tiles, aspect_w, aspect_h)?;

    let mut best: Option<Candidate> = None;
    for candidate in candidates.into_iter().filter(|c| c.feasible) {
        best = match best {
            None => Some(candidate),
            Some(current) if is_better(&candidate, &current) => Some(candidate),
            keep => keep,
        };
    }
    let best = best.ok_or(LayoutError::NoFeasibleShape { num_tiles })?;

    let container_constraint = if scale_factor(container, aspect_w, aspect_h) > 1.0 {
        Constraint::Width
    } else {
        Constraint::Height
    };

    Ok(GridSolution {
        shape: GridShape {
            columns: best.columns,
            rows: best.rows,
            constraint: best.constraint,
            cell_width_px: aspect_w * best.scale,
            cell_height_px: aspect_h * best.scale,
        },
        container_constraint,
    })
}

/// Strictly better: larger scale, or equal scale with fewer cells.
fn is_better(candidate: &Candidate, current: &Candidate) -> bool {
    candidate.scale > current.scale
        || (candidate.scale == current.scale && candidate.cell_count() < current.cell_count())
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
