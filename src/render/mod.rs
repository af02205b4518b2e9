//! What the overlay shows, and the seam to whatever paints it.
//!
//! The session controller builds an [`OverlayView`] for the current page and
//! hands it to an [`OverlayRenderer`]. [`format_overlay`] turns a view into a
//! bordered text panel with click targets for terminal hosts.

mod frame;
mod text;
mod theme;

pub use frame::{format_overlay, overlay_inner_width, HitRegion, OverlayFrame};
pub use text::{display_width, fit_to_width, sanitize_title, truncate_to_width};
pub use theme::{BorderSet, Theme, ThemeColors};

/// One visible item with its hint.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub slot: usize,
    /// `None` only when the page outgrew the alphabet.
    pub hint: Option<char>,
    pub title: String,
    pub pinned: bool,
}

/// Snapshot of everything the renderer needs for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub rows: Vec<ViewRow>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub page_label: String,
    pub zoom: f64,
}

/// Pointer-reachable controls on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Item(usize),
    Close(usize),
    TogglePin(usize),
    PrevPage,
    NextPage,
}

/// Paints the overlay. The controller guarantees `mount` and `unmount`
/// alternate, with any number of `update`s between them.
pub trait OverlayRenderer {
    fn mount(&mut self, view: &OverlayView);
    fn update(&mut self, view: &OverlayView);
    fn unmount(&mut self);
}
