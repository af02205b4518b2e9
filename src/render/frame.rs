//! Bordered text panel for terminal hosts.
//!
//! Every row has exactly `inner_width` visible columns between the borders;
//! color codes are zero-width and never counted.

use std::ops::Range;

use super::text::{display_width, fit_to_width, sanitize_title};
use super::theme::ThemeColors;
use super::{OverlayView, PointerTarget, ViewRow};

const MIN_INNER_WIDTH: usize = 36;
const MAX_INNER_WIDTH: usize = 72;
/// " [H] ● " ahead of the title.
const ROW_PREFIX_COLS: usize = 7;
/// " unpin x " after the title.
const ROW_SUFFIX_COLS: usize = 9;
const PIN_LABEL_COLS: usize = 5;
const NAV_PREV: &str = " < Prev";
const NAV_NEXT: &str = "Next > ";
const HELP_TEXT: &str = "Esc close · Tab next · Shift+Tab prev";
/// Title, three separators/borders, footer, help.
const CHROME_ROWS: usize = 7;

/// Clickable span on a frame line. Columns count from the left border (0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRegion {
    pub line: usize,
    pub cols: Range<usize>,
    pub target: PointerTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub lines: Vec<String>,
    /// Outer width including both borders.
    pub width: usize,
    pub hits: Vec<HitRegion>,
}

impl OverlayFrame {
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn hit(&self, line: usize, col: usize) -> Option<PointerTarget> {
        self.hits
            .iter()
            .find(|region| region.line == line && region.cols.contains(&col))
            .map(|region| region.target)
    }
}

/// Panel width for a terminal, counter-scaled by the host zoom so the panel
/// keeps roughly the same apparent size.
pub fn overlay_inner_width(terminal_cols: usize, zoom: f64) -> usize {
    let zoom = if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        1.0
    };
    let base = terminal_cols
        .saturating_sub(4)
        .clamp(MIN_INNER_WIDTH, MAX_INNER_WIDTH);
    let scaled = (base as f64 / zoom).round() as usize;
    let ceiling = terminal_cols.saturating_sub(2).max(MIN_INNER_WIDTH);
    scaled.clamp(MIN_INNER_WIDTH, ceiling)
}

pub fn format_overlay(view: &OverlayView, colors: &ThemeColors, terminal_cols: usize) -> OverlayFrame {
    let inner = overlay_inner_width(terminal_cols, view.zoom);
    let borders = &colors.borders;
    let horizontal: String = std::iter::repeat_n(borders.horizontal, inner).collect();
    let mut lines = Vec::with_capacity(CHROME_ROWS + view.page_size);
    let mut hits = Vec::new();

    lines.push(format!(
        "{}{}{}{}{}",
        colors.border, borders.top_left, horizontal, borders.top_right, colors.reset
    ));
    let title = format!("Tabs · {}", view.total_items);
    lines.push(bordered(colors, &centered(&title, inner)));
    lines.push(separator(colors, &horizontal));

    let title_cols = inner - ROW_PREFIX_COLS - ROW_SUFFIX_COLS;
    let body_rows = view.page_size.max(view.rows.len()).max(1);
    for idx in 0..body_rows {
        let line_idx = lines.len();
        match view.rows.get(idx) {
            Some(row) => {
                lines.push(format_row(colors, row, title_cols));
                let item_end = 1 + ROW_PREFIX_COLS + title_cols;
                let pin_start = item_end + 1;
                let close_start = pin_start + PIN_LABEL_COLS + 1;
                hits.push(HitRegion {
                    line: line_idx,
                    cols: 1..item_end,
                    target: PointerTarget::Item(row.slot),
                });
                hits.push(HitRegion {
                    line: line_idx,
                    cols: pin_start..pin_start + PIN_LABEL_COLS,
                    target: PointerTarget::TogglePin(row.slot),
                });
                hits.push(HitRegion {
                    line: line_idx,
                    cols: close_start..close_start + 1,
                    target: PointerTarget::Close(row.slot),
                });
            }
            None if idx == 0 => {
                let empty = format!("{}{}{}", colors.dim, centered("No tabs", inner), colors.reset);
                lines.push(bordered(colors, &empty));
            }
            None => lines.push(bordered(colors, &" ".repeat(inner))),
        }
    }

    lines.push(separator(colors, &horizontal));
    let footer_line = lines.len();
    let middle = inner - NAV_PREV.chars().count() - NAV_NEXT.chars().count();
    lines.push(bordered(
        colors,
        &format!(
            "{NAV_PREV}{}{}{}{NAV_NEXT}",
            colors.accent,
            centered(&view.page_label, middle),
            colors.reset
        ),
    ));
    hits.push(HitRegion {
        line: footer_line,
        cols: 2..1 + NAV_PREV.len(),
        target: PointerTarget::PrevPage,
    });
    let next_start = 1 + inner - NAV_NEXT.len();
    hits.push(HitRegion {
        line: footer_line,
        cols: next_start..next_start + NAV_NEXT.trim_end().len(),
        target: PointerTarget::NextPage,
    });

    lines.push(bordered(
        colors,
        &format!("{}{}{}", colors.dim, centered(HELP_TEXT, inner), colors.reset),
    ));
    lines.push(format!(
        "{}{}{}{}{}",
        colors.border, borders.bottom_left, horizontal, borders.bottom_right, colors.reset
    ));

    OverlayFrame {
        lines,
        width: inner + 2,
        hits,
    }
}

fn format_row(colors: &ThemeColors, row: &ViewRow, title_cols: usize) -> String {
    let badge = match row.hint {
        Some(hint) => format!("{}[{hint}]{}", colors.hint, colors.reset),
        None => "   ".to_string(),
    };
    let marker = if row.pinned {
        format!("{}{}{}", colors.pinned, colors.pin_marker, colors.reset)
    } else {
        " ".to_string()
    };
    let title = fit_to_width(&sanitize_title(&row.title), title_cols);
    let pin_label = if row.pinned { "unpin" } else { "pin" };
    let content = format!(
        " {badge} {marker} {title} {}{:<width$}{} {}x{} ",
        colors.dim,
        pin_label,
        colors.reset,
        colors.danger,
        colors.reset,
        width = PIN_LABEL_COLS
    );
    bordered(colors, &content)
}

fn bordered(colors: &ThemeColors, content: &str) -> String {
    format!(
        "{}{}{}{}{}{}{}",
        colors.border,
        colors.borders.vertical,
        colors.reset,
        content,
        colors.border,
        colors.borders.vertical,
        colors.reset
    )
}

fn separator(colors: &ThemeColors, horizontal: &str) -> String {
    format!(
        "{}{}{}{}{}",
        colors.border, colors.borders.t_left, horizontal, colors.borders.t_right, colors.reset
    )
}

fn centered(text: &str, width: usize) -> String {
    let text = fit_to_width(text, width);
    let text = text.trim_end();
    let padding = width.saturating_sub(display_width(text));
    let left = padding / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(padding - left))
}
