//! Terminal painter: the host page with the overlay panel centered on top.

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use tabhint::render::{
    fit_to_width, format_overlay, sanitize_title, OverlayFrame, OverlayRenderer, OverlayView,
    PointerTarget, ThemeColors,
};

use crate::host::HostPage;

struct PlacedFrame {
    frame: OverlayFrame,
    left: u16,
    top: u16,
}

pub(crate) struct TerminalRenderer {
    colors: ThemeColors,
    cols: u16,
    rows: u16,
    view: Option<OverlayView>,
    placed: Option<PlacedFrame>,
    dirty: bool,
}

impl TerminalRenderer {
    pub(crate) fn new(colors: ThemeColors, cols: u16, rows: u16) -> Self {
        Self {
            colors,
            cols,
            rows,
            view: None,
            placed: None,
            dirty: true,
        }
    }

    pub(crate) fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.relayout();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Control under a terminal cell, if the panel is showing.
    pub(crate) fn hit(&self, col: u16, row: u16) -> Option<PointerTarget> {
        let placed = self.placed.as_ref()?;
        if col < placed.left || row < placed.top {
            return None;
        }
        placed.frame.hit(
            usize::from(row - placed.top),
            usize::from(col - placed.left),
        )
    }

    fn relayout(&mut self) {
        self.placed = self.view.as_ref().map(|view| {
            let frame = format_overlay(view, &self.colors, usize::from(self.cols));
            let width = u16::try_from(frame.width).unwrap_or(u16::MAX);
            let height = u16::try_from(frame.height()).unwrap_or(u16::MAX);
            PlacedFrame {
                left: self.cols.saturating_sub(width) / 2,
                top: self.rows.saturating_sub(height) / 2,
                frame,
            }
        });
        self.dirty = true;
    }

    pub(crate) fn present(
        &mut self,
        out: &mut impl Write,
        page: &HostPage,
        header: &str,
    ) -> io::Result<()> {
        queue!(out, Clear(ClearType::All))?;
        for (row, line) in page_lines(page, &self.colors, self.cols, self.rows, header)
            .iter()
            .enumerate()
        {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(out, MoveTo(0, row), Print(line))?;
        }
        if let Some(placed) = &self.placed {
            for (offset, line) in placed.frame.lines.iter().enumerate() {
                let row = placed
                    .top
                    .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
                if row >= self.rows {
                    break;
                }
                queue!(out, MoveTo(placed.left, row), Print(line))?;
            }
        }
        out.flush()?;
        self.dirty = false;
        Ok(())
    }
}

impl OverlayRenderer for TerminalRenderer {
    fn mount(&mut self, view: &OverlayView) {
        self.view = Some(view.clone());
        self.relayout();
    }

    fn update(&mut self, view: &OverlayView) {
        self.view = Some(view.clone());
        self.relayout();
    }

    fn unmount(&mut self) {
        self.view = None;
        self.placed = None;
        self.dirty = true;
    }
}

/// Header, the tab strip (one tab per line) and a status line at the bottom.
pub(crate) fn page_lines(
    page: &HostPage,
    colors: &ThemeColors,
    cols: u16,
    rows: u16,
    header: &str,
) -> Vec<String> {
    let width = usize::from(cols);
    let rows = usize::from(rows);
    if rows == 0 || width == 0 {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "{}{}{}",
        colors.accent,
        fit_to_width(header, width),
        colors.reset
    )];
    let strip_rows = rows.saturating_sub(3);
    for tab in page.tabs.iter().take(strip_rows) {
        let active = page.active.as_ref() == Some(&tab.id);
        let cursor = if active { '>' } else { ' ' };
        let pin = if tab.pinned { colors.pin_marker } else { " " };
        let text = format!(" {cursor} {pin} {}", sanitize_title(&tab.display_title()));
        let text = fit_to_width(&text, width);
        if active {
            lines.push(format!("{}{text}{}", colors.hint, colors.reset));
        } else {
            lines.push(text);
        }
    }
    if page.tabs.len() > strip_rows {
        if let Some(last) = lines.last_mut() {
            *last = fit_to_width(
                &format!("   … {} more", page.tabs.len() + 1 - strip_rows),
                width,
            );
        }
    }
    while lines.len() + 1 < rows {
        lines.push(String::new());
    }
    lines.push(format!(
        "{}{}{}",
        colors.dim,
        fit_to_width(&page.status, width),
        colors.reset
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabhint::item::{Item, ItemId};
    use tabhint::render::{display_width, Theme, ViewRow};

    fn sample_page() -> HostPage {
        HostPage {
            tabs: vec![
                Item::new(1u64, "Inbox").pinned(true),
                Item::new(2u64, "Docs"),
                Item::new(3u64, "Music"),
            ],
            active: Some(ItemId::from(2u64)),
            status: "ready".to_string(),
        }
    }

    fn one_row_view() -> OverlayView {
        OverlayView {
            rows: vec![ViewRow {
                slot: 0,
                hint: Some('1'),
                title: "Inbox".to_string(),
                pinned: false,
            }],
            page: 0,
            total_pages: 1,
            page_size: 10,
            total_items: 1,
            page_label: "Page 1 of 1".to_string(),
            zoom: 1.0,
        }
    }

    #[test]
    fn page_fills_the_screen_and_marks_the_active_tab() {
        let colors = Theme::None.colors();
        let lines = page_lines(&sample_page(), &colors, 40, 10, "tabhint");
        assert_eq!(lines.len(), 10);
        assert!(lines[1].starts_with("   * Inbox"));
        assert!(lines[2].starts_with(" >   Docs"));
        assert!(lines[9].starts_with("ready"));
        assert!(lines.iter().all(|line| display_width(line) <= 40));
    }

    #[test]
    fn long_tab_lists_are_summarized() {
        let colors = Theme::None.colors();
        let lines = page_lines(&sample_page(), &colors, 40, 5, "tabhint");
        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("… 2 more"), "{lines:?}");
    }

    #[test]
    fn hits_translate_screen_cells_into_panel_controls() {
        let mut renderer = TerminalRenderer::new(Theme::None.colors(), 80, 24);
        assert_eq!(renderer.hit(10, 10), None);
        renderer.mount(&one_row_view());
        let placed = renderer.placed.as_ref().expect("mounted frame");
        let (left, top) = (placed.left, placed.top);
        assert_eq!(left, 3);
        assert_eq!(renderer.hit(left + 5, top + 3), Some(PointerTarget::Item(0)));
        assert_eq!(renderer.hit(0, 0), None);
        renderer.unmount();
        assert_eq!(renderer.hit(left + 5, top + 3), None);
        assert!(renderer.is_dirty());
    }

    #[test]
    fn present_draws_page_and_panel() {
        let mut renderer = TerminalRenderer::new(Theme::None.colors(), 80, 24);
        renderer.mount(&one_row_view());
        let mut out = Vec::new();
        renderer
            .present(&mut out, &sample_page(), "tabhint header")
            .unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("tabhint header"));
        assert!(text.contains("Page 1 of 1"));
        assert!(!renderer.is_dirty());
    }
}
