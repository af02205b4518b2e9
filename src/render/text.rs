//! Column-accurate string fitting for titles.
//!
//! Tab titles carry CJK, emoji and other wide glyphs, so truncation works in
//! terminal columns rather than chars or bytes, and never splits a char.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit `s` into `max_cols` columns, ending in an ellipsis when cut.
pub fn truncate_to_width(s: &str, max_cols: usize) -> String {
    if display_width(s) <= max_cols {
        return s.to_string();
    }
    if max_cols == 0 {
        return String::new();
    }
    let budget = max_cols - 1;
    let mut out = String::new();
    let mut used = 0usize;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

/// Truncate then right-pad with spaces to exactly `cols` columns.
pub fn fit_to_width(s: &str, cols: usize) -> String {
    let mut out = truncate_to_width(s, cols);
    let used = display_width(&out);
    out.extend(std::iter::repeat_n(' ', cols.saturating_sub(used)));
    out
}

/// Strip control characters so a hostile title cannot move the cursor.
pub fn sanitize_title(s: &str) -> String {
    s.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}
