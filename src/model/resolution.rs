//! Supported feed resolutions.
//!
//! A [`ResolutionCatalog`] is an ascending ladder of resolutions that all
//! share one aspect ratio. Cameras are asked for the smallest rung that
//! covers the box a tile is drawn into.

use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Relative tolerance when comparing aspect ratios of catalog entries.
const ASPECT_TOLERANCE: f64 = 1e-6;

/// A feed resolution in pixels. Both dimensions are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Smart constructor: rejects zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, CatalogError> {
        if width == 0 || height == 0 {
            return Err(CatalogError::ZeroDimension { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Whether this resolution is at least as large as the target box on both axes.
    pub fn covers(&self, target_width: f64, target_height: f64) -> bool {
        f64::from(self.width) >= target_width && f64::from(self.height) >= target_height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Result of a catalog lookup.
///
/// `upscaled` is set when no catalog entry was large enough and the largest
/// one was returned instead. The renderer must stretch the image in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Covering {
    /// Chosen catalog entry.
    pub resolution: Resolution,
    /// The entry is smaller than the target box.
    pub upscaled: bool,
}

/// Errors detected while building a catalog. All are fatal configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No entries at all.
    #[error("Resolution catalog must contain at least one entry")]
    Empty,

    /// An entry has zero width or height.
    #[error("Resolution {width}x{height} has a zero dimension")]
    ZeroDimension {
        /// Offending width.
        width: u32,
        /// Offending height.
        height: u32,
    },

    /// An entry's aspect ratio differs from the first entry's.
    #[error("Resolution {found} does not share the catalog aspect ratio of {expected}")]
    AspectMismatch {
        /// First catalog entry.
        expected: Resolution,
        /// Entry with a different aspect ratio.
        found: Resolution,
    },

    /// Entries are not strictly ascending on both axes.
    #[error("Resolution {found} must be larger than the preceding entry {previous}")]
    NotAscending {
        /// Entry before the offending one.
        previous: Resolution,
        /// Entry that is not larger.
        found: Resolution,
    },
}

/// Ascending, fixed-aspect list of supported resolutions.
///
/// # Invariants
/// - At least one entry
/// - Every entry has the aspect ratio of the first one
/// - Strictly ascending by width (and therefore by height)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionCatalog {
    entries: Vec<Resolution>,
}

impl ResolutionCatalog {
    /// Build a catalog, validating every invariant.
    pub fn new(entries: Vec<Resolution>) -> Result<Self, CatalogError> {
        let first = *entries.first().ok_or(CatalogError::Empty)?;
        let expected_aspect = first.aspect_ratio();

        for pair in entries.windows(2) {
            let (previous, found) = (pair[0], pair[1]);
            let aspect = found.aspect_ratio();
            if ((aspect - expected_aspect) / expected_aspect).abs() > ASPECT_TOLERANCE {
                return Err(CatalogError::AspectMismatch {
                    expected: first,
                    found,
                });
            }
            if found.width <= previous.width || found.height <= previous.height {
                return Err(CatalogError::NotAscending { previous, found });
            }
        }

        Ok(Self { entries })
    }

    /// Build a catalog from raw `[width, height]` pairs (config file form).
    pub fn from_pairs(pairs: &[[u32; 2]]) -> Result<Self, CatalogError> {
        let entries = pairs
            .iter()
            .map(|[w, h]| Resolution::new(*w, *h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    /// All entries, ascending.
    pub fn entries(&self) -> &[Resolution] {
        &self.entries
    }

    /// Smallest entry. Its dimensions double as the tile aspect ratio.
    pub fn smallest(&self) -> Resolution {
        self.entries[0]
    }

    /// Largest entry; the upscale fallback.
    pub fn largest(&self) -> Resolution {
        self.entries[self.entries.len() - 1]
    }

    /// Shared aspect ratio as `(width, height)` of the smallest entry.
    pub fn aspect(&self) -> (f64, f64) {
        let smallest = self.smallest();
        (f64::from(smallest.width), f64::from(smallest.height))
    }

    /// Smallest entry whose width and height both cover the target box.
    ///
    /// Falls back to the largest entry (flagged `upscaled`) when the target
    /// is bigger than anything in the catalog.
    pub fn smallest_covering(&self, target_width: f64, target_height: f64) -> Covering {
        if let Some(resolution) = self
            .entries
            .iter()
            .find(|r| r.covers(target_width, target_height))
        {
            return Covering {
                resolution: *resolution,
                upscaled: false,
            };
        }

        let largest = self.largest();
        warn!(
            target_width,
            target_height,
            largest = %largest,
            "No supported resolution covers target, upscaling largest"
        );
        Covering {
            resolution: largest,
            upscaled: true,
        }
    }
}

impl Default for ResolutionCatalog {
    /// Eight-tier 4:3 ladder from 160x120 up to 1280x960.
    fn default() -> Self {
        const LADDER: [(u32, u32); 8] = [
            (160, 120),
            (240, 180),
            (320, 240),
            (480, 360),
            (640, 480),
            (800, 600),
            (1024, 768),
            (1280, 960),
        ];
        Self {
            entries: LADDER
                .iter()
                .map(|&(width, height)| Resolution { width, height })
                .collect(),
        }
    }
}
