//! Tile identifiers and the fixed tile set.
//!
//! A tile is one camera feed's slot in the grid. Its identifier is the feed
//! base URL; the index in the [`TileSet`] is its identity for the lifetime
//! of the controller.

use std::fmt;
use thiserror::Error;

/// Opaque feed source descriptor (typically the camera base URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileId(String);

impl TileId {
    /// Smart constructor: validates non-empty, trimmed descriptor
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidTileId> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidTileId::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed descriptor.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected tile descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTileId {
    /// Empty or whitespace only.
    #[error("Tile identifier cannot be empty")]
    Empty,
}

/// Rejected feed list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileSetError {
    /// No feeds given.
    #[error("At least one feed is required")]
    Empty,

    /// One descriptor is invalid.
    #[error("Invalid feed at position {index}: {source}")]
    InvalidTile {
        /// Position in the feed list.
        index: usize,
        /// Why the descriptor was rejected.
        #[source]
        source: InvalidTileId,
    },
}

/// Ordered, immutable, non-empty sequence of tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    tiles: Vec<TileId>,
}

impl TileSet {
    /// Smart constructor: rejects an empty list.
    pub fn new(tiles: Vec<TileId>) -> Result<Self, TileSetError> {
        if tiles.is_empty() {
            return Err(TileSetError::Empty);
        }
        Ok(Self { tiles })
    }

    /// Build a tile set from raw descriptors, reporting the first bad one.
    pub fn from_descriptors<S: AsRef<str>>(raw: &[S]) -> Result<Self, TileSetError> {
        let tiles = raw
            .iter()
            .enumerate()
            .map(|(index, s)| {
                TileId::new(s.as_ref()).map_err(|source| TileSetError::InvalidTile { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tiles)
    }

    /// Number of tiles. Always at least one.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&TileId> {
        self.tiles.get(index)
    }

    /// Whether `index` names a tile.
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.tiles.len()
    }

    /// Tiles in display order.
    pub fn iter(&self) -> impl Iterator<Item = &TileId> {
        self.tiles.iter()
    }
}
