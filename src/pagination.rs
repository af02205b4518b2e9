//! Fixed-size paging over the item list.
//!
//! Everything here is a pure function of `(len, page_size, page)`; navigation
//! always wraps and never fails, including on an empty or single-page list.

use std::ops::Range;

/// Items shown per overlay page.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    len: usize,
    page_size: usize,
}

impl Pagination {
    /// `page_size` of zero is treated as one so page math never divides by zero.
    pub fn new(len: usize, page_size: usize) -> Self {
        Self {
            len,
            page_size: page_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// At least one page, even for an empty list.
    pub fn total_pages(&self) -> usize {
        self.len.div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&self, page: usize) -> usize {
        (self.clamp_page(page) + 1) % self.total_pages()
    }

    pub fn prev_page(&self, page: usize) -> usize {
        let total = self.total_pages();
        (self.clamp_page(page) + total - 1) % total
    }

    /// Coerce a page index that may be stale (list shrank) into range.
    pub fn clamp_page(&self, page: usize) -> usize {
        page.min(self.total_pages() - 1)
    }

    /// Index range into the full list for `page`; empty when the list is.
    pub fn visible_range(&self, page: usize) -> Range<usize> {
        let start = self.clamp_page(page).saturating_mul(self.page_size).min(self.len);
        let end = start.saturating_add(self.page_size).min(self.len);
        start..end
    }

    pub fn visible_slice<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let range = self.visible_range(page);
        items.get(range).unwrap_or(&[])
    }

    /// Resolve a slot on `page` to an overall index, if an item lives there.
    pub fn overall_index(&self, page: usize, slot: usize) -> Option<usize> {
        if slot >= self.page_size {
            return None;
        }
        let index = self.clamp_page(page) * self.page_size + slot;
        (index < self.len).then_some(index)
    }

    pub fn page_label(&self, page: usize) -> String {
        format!(
            "Page {} of {}",
            self.clamp_page(page) + 1,
            self.total_pages()
        )
    }
}
