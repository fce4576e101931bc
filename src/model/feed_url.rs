//! Feed URL construction.
//!
//! The core never interprets feed URLs; it only compares them. A
//! [`FeedUrlBuilder`] turns a tile and a resolution into the string the
//! image layer fetches.

use crate::model::{Resolution, TileId};
use thiserror::Error;

/// Builds the image URL for a tile at a given resolution.
pub trait FeedUrlBuilder {
    /// URL for `tile` at `resolution`. Equal inputs must give equal URLs.
    fn build(&self, tile: &TileId, resolution: Resolution) -> String;
}

impl<F> FeedUrlBuilder for F
where
    F: Fn(&TileId, Resolution) -> String,
{
    fn build(&self, tile: &TileId, resolution: Resolution) -> String {
        self(tile, resolution)
    }
}

/// Placeholder-based URL template.
///
/// Supported placeholders: `{base}` (the tile descriptor), `{width}`, `{height}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

/// Default MJPEG endpoint exposed by most network cameras.
pub const DEFAULT_URL_TEMPLATE: &str = "{base}mjpg/video.mjpg?resolution={width}x{height}";

/// Invalid URL template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlTemplateError {
    /// The template never mentions `{base}`, so every feed would get the same URL.
    #[error("URL template must contain the {{base}} placeholder: {0}")]
    MissingBase(String),
}

impl UrlTemplate {
    /// Smart constructor: the template must reference the tile base.
    pub fn new(template: impl Into<String>) -> Result<Self, UrlTemplateError> {
        let template = template.into();
        if !template.contains("{base}") {
            return Err(UrlTemplateError::MissingBase(template));
        }
        Ok(Self { template })
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl FeedUrlBuilder for UrlTemplate {
    fn build(&self, tile: &TileId, resolution: Resolution) -> String {
        let placeholders = [
            ("{base}", tile.as_str().to_string()),
            ("{width}", resolution.width().to_string()),
            ("{height}", resolution.height().to_string()),
        ];

        // Single pass over the template; substituted text is never rescanned
        let mut url = String::with_capacity(self.template.len() + tile.as_str().len());
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            url.push_str(&rest[..start]);
            let tail = &rest[start..];
            match placeholders.iter().find(|(name, _)| tail.starts_with(name)) {
                Some((name, value)) => {
                    url.push_str(value);
                    rest = &tail[name.len()..];
                }
                None => {
                    url.push('{');
                    rest = &tail[1..];
                }
            }
        }
        url.push_str(rest);
        url
    }
}
