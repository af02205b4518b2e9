//! Overlay sessions: one open/close cycle of the tab picker.
//!
//! A [`Session`] is created from a fresh item snapshot every time the overlay
//! opens and dropped when it closes. [`OverlayController`] owns it together
//! with the input capture and drives the gateway.

mod controller;

#[cfg(test)]
mod tests;

use std::fmt;

use crate::gateway::RequestId;
use crate::hints::HintAlphabet;
use crate::item::Item;
use crate::pagination::Pagination;
use crate::render::{OverlayView, ViewRow};

pub use controller::{ControllerSettings, ItemAction, OverlayController, OverlayPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    items: Vec<Item>,
    pagination: Pagination,
    page: usize,
    zoom: f64,
    zoom_request: Option<RequestId>,
}

impl Session {
    pub(crate) fn new(id: SessionId, items: Vec<Item>, page_size: usize) -> Self {
        Self {
            id,
            pagination: Pagination::new(items.len(), page_size),
            items,
            page: 0,
            zoom: 1.0,
            zoom_request: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn visible_items(&self) -> &[Item] {
        self.pagination.visible_slice(&self.items, self.page)
    }

    pub(crate) fn next_page(&mut self) {
        self.page = self.pagination.next_page(self.page);
    }

    pub(crate) fn prev_page(&mut self) {
        self.page = self.pagination.prev_page(self.page);
    }

    /// Item bound to `slot` on the current page.
    pub fn item_for_slot(&self, slot: usize) -> Option<&Item> {
        self.pagination
            .overall_index(self.page, slot)
            .and_then(|idx| self.items.get(idx))
    }

    pub(crate) fn expect_zoom(&mut self, request: RequestId) {
        self.zoom_request = Some(request);
    }

    pub(crate) fn awaiting_zoom(&self, request: RequestId) -> bool {
        self.zoom_request == Some(request)
    }

    pub(crate) fn apply_zoom(&mut self, zoom: f64) {
        self.zoom_request = None;
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    pub(crate) fn clear_zoom_request(&mut self) {
        self.zoom_request = None;
    }

    pub fn view(&self, alphabet: &HintAlphabet) -> OverlayView {
        let visible = self.visible_items();
        let hints = alphabet.assign(visible.len());
        let rows = visible
            .iter()
            .zip(hints)
            .enumerate()
            .map(|(slot, (item, hint))| ViewRow {
                slot,
                hint,
                title: item.display_title(),
                pinned: item.pinned,
            })
            .collect();
        OverlayView {
            rows,
            page: self.page,
            total_pages: self.pagination.total_pages(),
            page_size: self.pagination.page_size(),
            total_items: self.items.len(),
            page_label: self.pagination.page_label(self.page),
            zoom: self.zoom,
        }
    }
}
