//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod feed_url;
pub mod grid;
pub mod key_action;
pub mod resolution;
pub mod tile;

// Re-export for convenience
pub use error::AppError;
pub use feed_url::{FeedUrlBuilder, UrlTemplate, UrlTemplateError, DEFAULT_URL_TEMPLATE};
pub use grid::{Constraint, ContainerSize, GridShape, GridSolution};
pub use key_action::KeyAction;
pub use resolution::{CatalogError, Covering, Resolution, ResolutionCatalog};
pub use tile::{InvalidTileId, TileId, TileSet, TileSetError};
