//! Pipe tables rendered as fixed-width text.
//!
//! Telegram has no table markup, so a table becomes a `<pre>` block with
//! space-padded columns:
//!
//! ```text
//! | a | b  |        <pre>
//! |---|----|   ─▶   a | b
//! | 1 | 22 |        --+---
//!                   1 | 22
//!                   </pre>
//! ```
//!
//! Column widths are measured on the escaped cell text in chars, so an
//! entity such as `&amp;` or a double-width glyph can misalign a column.

use chatmark_syntax::Tag;

use crate::escape::escape_text;

pub const PIPE: char = '|';
pub const COLUMN_SEPARATOR: &str = " | ";
pub const HEADER_JUNCTION: &str = "-+-";

/// True for a line that can be a table header or data row.
pub fn is_row(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty() && t.contains(PIPE)
}

/// True for the `---|:---:` line under a header.
pub fn is_separator(line: &str) -> bool {
    let t = line.trim();
    t.contains(PIPE)
        && t.contains('-')
        && t.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// Renders table lines (header, separator, data rows) as a `<pre>` block.
///
/// Returns `None` when the lines do not form a usable table: fewer than two
/// non-empty lines, or no row with any content. Callers keep such input as
/// literal text.
pub fn render(lines: &[&str]) -> Option<String> {
    let lines: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < 2 {
        return None;
    }

    let rows: Vec<Vec<String>> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 1)
        .filter_map(|(_, line)| parse_row(line))
        .collect();
    let header = rows.first()?;

    let mut widths = vec![0; header.len()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = Tag::Pre.open();
    out.push('\n');
    for (idx, row) in rows.iter().enumerate() {
        let padded: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(&padded.join(COLUMN_SEPARATOR));
        out.push('\n');

        if idx == 0 {
            let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            out.push_str(&rule.join(HEADER_JUNCTION));
            out.push('\n');
        }
    }
    out.push_str(&Tag::Pre.close());
    Some(out)
}

/// Splits a row into escaped, trimmed cells. The empty cells produced by a
/// leading or trailing pipe are dropped; interior empty cells are kept.
fn parse_row(line: &str) -> Option<Vec<String>> {
    let mut cells: Vec<&str> = line.split(PIPE).map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    if cells.iter().all(|c| c.is_empty()) {
        return None;
    }
    Some(cells.into_iter().map(|c| escape_text(c).into_owned()).collect())
}
