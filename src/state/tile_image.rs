//! Per-tile image bookkeeping.
//!
//! Each tile double-buffers its feed image: a new URL loads into the slot
//! that is not on screen, and the old slot is discarded only after the new
//! one reports loaded. Requests are addressed by URL string; asking for the
//! URL that is already shown or already loading is a no-op, which keeps
//! live streams from restarting.

use crate::state::command::ImageSlot;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SlotImage {
    slot: ImageSlot,
    url: String,
}

/// What the controller must tell the surface after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUpdate {
    /// URL already shown or loading.
    Unchanged,
    /// Start loading into this slot.
    Request(ImageSlot),
    /// The shown image is wanted again; throw away the in-flight load in this slot.
    CancelPending(ImageSlot),
}

/// Shown and pending image of one tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileImage {
    shown: Option<SlotImage>,
    pending: Option<SlotImage>,
}

impl TileImage {
    /// URL currently on screen.
    pub fn shown_url(&self) -> Option<&str> {
        self.shown.as_ref().map(|s| s.url.as_str())
    }

    /// URL the tile is converging to: the pending one if loading, else the shown one.
    pub fn target_url(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .or(self.shown.as_ref())
            .map(|s| s.url.as_str())
    }

    /// A request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Ask for `url` to be displayed.
    pub fn request(&mut self, url: &str) -> ImageUpdate {
        if self.pending.as_ref().is_some_and(|p| p.url == url) {
            return ImageUpdate::Unchanged;
        }

        if self.shown.as_ref().is_some_and(|s| s.url == url) {
            return match self.pending.take() {
                Some(stale) => ImageUpdate::CancelPending(stale.slot),
                None => ImageUpdate::Unchanged,
            };
        }

        // A load already in flight keeps its slot; the new URL replaces it there.
        let slot = match (&self.pending, &self.shown) {
            (Some(pending), _) => pending.slot,
            (None, Some(shown)) => shown.slot.other(),
            (None, None) => ImageSlot::Front,
        };
        self.pending = Some(SlotImage {
            slot,
            url: url.to_string(),
        });
        ImageUpdate::Request(slot)
    }

    /// A slot finished loading. Returns the slot that may now be discarded.
    ///
    /// Notifications for slots that are no longer pending are stale and ignored.
    pub fn loaded(&mut self, slot: ImageSlot) -> Option<ImageSlot> {
        if self.pending.as_ref().map(|p| p.slot) != Some(slot) {
            return None;
        }
        let previous = std::mem::replace(&mut self.shown, self.pending.take());
        previous.map(|p| p.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_uses_front_slot() {
        let mut image = TileImage::default();
        assert_eq!(image.request("a"), ImageUpdate::Request(ImageSlot::Front));
        assert!(image.is_loading());
        assert_eq!(image.shown_url(), None);
        assert_eq!(image.target_url(), Some("a"));
    }

    #[test]
    fn first_load_has_nothing_to_discard() {
        let mut image = TileImage::default();
        image.request("a");
        assert_eq!(image.loaded(ImageSlot::Front), None);
        assert_eq!(image.shown_url(), Some("a"));
        assert!(!image.is_loading());
    }

    #[test]
    fn repeated_request_for_shown_url_is_unchanged() {
        let mut image = TileImage::default();
        image.request("a");
        image.loaded(ImageSlot::Front);
        assert_eq!(image.request("a"), ImageUpdate::Unchanged);
    }

    #[test]
    fn repeated_request_for_pending_url_is_unchanged() {
        let mut image = TileImage::default();
        image.request("a");
        assert_eq!(image.request("a"), ImageUpdate::Unchanged);
    }

    #[test]
    fn new_url_loads_into_other_slot_then_discards_old() {
        let mut image = TileImage::default();
        image.request("a");
        image.loaded(ImageSlot::Front);

        assert_eq!(image.request("b"), ImageUpdate::Request(ImageSlot::Back));
        // Old image stays on screen while loading
        assert_eq!(image.shown_url(), Some("a"));

        assert_eq!(image.loaded(ImageSlot::Back), Some(ImageSlot::Front));
        assert_eq!(image.shown_url(), Some("b"));
    }

    #[test]
    fn superseding_pending_load_reuses_its_slot() {
        let mut image = TileImage::default();
        image.request("a");
        image.loaded(ImageSlot::Front);
        image.request("b");

        assert_eq!(image.request("c"), ImageUpdate::Request(ImageSlot::Back));
        assert_eq!(image.target_url(), Some("c"));
    }

    #[test]
    fn returning_to_shown_url_cancels_pending() {
        let mut image = TileImage::default();
        image.request("a");
        image.loaded(ImageSlot::Front);
        image.request("b");

        assert_eq!(
            image.request("a"),
            ImageUpdate::CancelPending(ImageSlot::Back)
        );
        assert!(!image.is_loading());
        assert_eq!(image.target_url(), Some("a"));
    }

    #[test]
    fn stale_load_notification_is_ignored() {
        let mut image = TileImage::default();
        image.request("a");
        image.loaded(ImageSlot::Front);

        assert_eq!(image.loaded(ImageSlot::Back), None);
        assert_eq!(image.loaded(ImageSlot::Front), None);
        assert_eq!(image.shown_url(), Some("a"));
    }
}
