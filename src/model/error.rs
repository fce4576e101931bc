//! Error types for camgrid.
//!
//! This module defines the top-level error taxonomy using `thiserror`. Each
//! concern owns its own error enum next to the code that raises it; this
//! module composes them so `main` can propagate everything with `?`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error
//!   - [`CatalogError`] - Invalid resolution catalog (empty, mixed aspect, unsorted)
//!   - [`TileSetError`] - No feeds configured or an empty feed descriptor
//!   - [`UrlTemplateError`] - URL template missing the `{base}` placeholder
//!   - [`ConfigError`] - Config file unreadable or not valid TOML
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - [`TuiError`] - Terminal I/O failures
//!
//! # Recovery Strategy
//!
//! Configuration errors are fatal and detected before the grid is shown.
//! Degraded rendering (a container larger than any supported resolution) is
//! never an error: it is logged and handled with upscale styling. Redundant
//! requests and toggles are absorbed silently.
//!
//! [`CatalogError`]: crate::model::CatalogError
//! [`TileSetError`]: crate::model::TileSetError
//! [`UrlTemplateError`]: crate::model::UrlTemplateError
//! [`ConfigError`]: crate::config::ConfigError
//! [`LoggingError`]: crate::logging::LoggingError
//! [`TuiError`]: crate::view::TuiError

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::model::{CatalogError, TileSetError, UrlTemplateError};
use crate::view::TuiError;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// # Examples
///
/// ```
/// use camgrid::model::{AppError, TileSet};
///
/// fn load_feeds() -> Result<TileSet, AppError> {
///     let feeds: [&str; 0] = [];
///     Ok(TileSet::from_descriptors(&feeds)?)
/// }
///
/// assert!(matches!(load_feeds(), Err(AppError::Tiles(_))));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Resolution catalog violates its invariants.
    #[error("Invalid resolution catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Feed list is empty or contains an empty descriptor.
    #[error("Invalid feed list: {0}")]
    Tiles(#[from] TileSetError),

    /// URL template cannot address individual feeds.
    #[error("Invalid URL template: {0}")]
    UrlTemplate(#[from] UrlTemplateError),

    /// Config file exists but could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal setup, drawing or input failed.
    #[error("Terminal error: {0}")]
    Tui(#[from] TuiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_converts_via_from() {
        let err: AppError = CatalogError::Empty.into();
        assert!(matches!(err, AppError::Catalog(CatalogError::Empty)));
    }

    #[test]
    fn display_includes_underlying_message() {
        let err: AppError = TileSetError::Empty.into();
        assert_eq!(
            err.to_string(),
            "Invalid feed list: At least one feed is required"
        );
    }

    #[test]
    fn question_mark_composes_config_errors() {
        fn load() -> Result<(), AppError> {
            Err(ConfigError::InvalidPath("bad".to_string()))?;
            Ok(())
        }
        assert!(matches!(load(), Err(AppError::Config(_))));
    }
}
