//! Terminal rendering of the derived result view.

use unicode_width::UnicodeWidthStr;

use alvara_recon::{Profile, Row, Schema};

/// Cap on any single column so wide descriptions don't swallow the line.
const MAX_COL_WIDTH: usize = 48;

/// Render rows as an aligned two-space-separated table with display-name
/// headers. Cells wider than the cap are truncated with "..".
pub(crate) fn render(profile: &Profile, schema: &Schema, rows: &[&Row]) -> String {
    let headers: Vec<String> = schema
        .columns()
        .iter()
        .map(|c| profile.display_name(c))
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, value) in row.values().iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(display_width(value));
            }
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_COL_WIDTH);
    }

    let mut out = String::new();

    let header_cells: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| pad_right(h, w))
        .collect();
    out.push_str(header_cells.join("  ").trim_end());
    out.push('\n');

    let divider: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&divider.join("  "));
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row
            .values()
            .iter()
            .zip(&widths)
            .map(|(v, &w)| pad_right(v, w))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}

/// Display width of a string, accounting for CJK double-width, emoji, etc.
fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".."
/// if truncated.
fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s.chars().take(width).collect();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}
