//! Block extraction: fenced code and pipe tables.
//!
//! Both are rendered to their final markup as soon as they are found and
//! held out of the inline passes as [`ProtectedBlock`]s. The document
//! becomes an ordered list of [`Segment`]s; inline rewriting only ever sees
//! the [`Segment::Inline`] pieces, so a `**` inside a code block can never
//! be turned into bold.

use chatmark_syntax::Tag;

use super::{cursor::Cursor, table};
use crate::escape::escape_text;

pub const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Code,
    Table,
}

/// A code block or table already rendered to markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBlock {
    /// Position in extraction order within one conversion.
    pub id: usize,
    pub kind: BlockKind,
    pub rendered: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Source text still to be run through the inline passes.
    Inline(&'a str),
    Protected(ProtectedBlock),
}

/// Hands out block ids for one conversion run.
#[derive(Debug, Default)]
pub struct Protector {
    next_id: usize,
}

impl Protector {
    pub fn protect(&mut self, kind: BlockKind, rendered: String) -> ProtectedBlock {
        let id = self.next_id;
        self.next_id += 1;
        ProtectedBlock { id, kind, rendered }
    }

    /// Number of blocks protected so far.
    pub fn count(&self) -> usize {
        self.next_id
    }
}

/// Splits `text` into inline segments and protected code/table blocks.
///
/// Code fences are extracted first; tables are then looked for only in the
/// text between fences.
pub fn extract<'a>(text: &'a str, protector: &mut Protector) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    for segment in extract_code_blocks(text, protector) {
        match segment {
            Segment::Inline(inline) => out.extend(extract_tables(inline, protector)),
            protected => out.push(protected),
        }
    }
    out
}

/// Finds "```lang\n ... ```" blocks. The fence may carry a language word,
/// which is dropped; the content runs to the next "```" anywhere.
fn extract_code_blocks<'a>(text: &'a str, protector: &mut Protector) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    let mut cur = Cursor::new(text);
    let mut copied = 0;

    while let Some(start) = cur.find(FENCE) {
        cur.seek(start + FENCE.len());
        cur.eat_while(|c| c.is_alphanumeric() || c == '_');
        if !cur.eat_newline() {
            // Not an opening fence here; retry one byte further on
            cur.seek(start + 1);
            continue;
        }
        let content_start = cur.i;
        let Some(close) = cur.find(FENCE) else {
            break;
        };

        push_inline(&mut out, &text[copied..start]);
        let rendered = format!(
            "{}{}{}",
            Tag::Pre.open(),
            escape_text(&text[content_start..close]),
            Tag::Pre.close()
        );
        out.push(Segment::Protected(protector.protect(BlockKind::Code, rendered)));

        copied = close + FENCE.len();
        cur.seek(copied);
    }

    push_inline(&mut out, &text[copied..]);
    out
}

/// Finds header + separator + rows runs of lines and renders them.
///
/// The newline before the header and the one ending the last row stay in
/// the surrounding inline text, so line structure around the table is kept.
fn extract_tables<'a>(text: &'a str, protector: &mut Protector) -> Vec<Segment<'a>> {
    let lines = line_spans(text);
    let line = |k: usize| &text[lines[k].0..lines[k].1];
    let mut out = Vec::new();
    let mut copied = 0;
    let mut i = 0;

    while i + 1 < lines.len() {
        if !(table::is_row(line(i)) && table::is_separator(line(i + 1))) {
            i += 1;
            continue;
        }

        let mut end = i + 2;
        while end < lines.len() && table::is_row(line(end)) {
            end += 1;
        }
        let table_lines: Vec<&str> = (i..end).map(line).collect();
        let Some(rendered) = table::render(&table_lines) else {
            i = end;
            continue;
        };

        let (table_start, _) = lines[i];
        let (_, table_end) = lines[end - 1];
        push_inline(&mut out, &text[copied..table_start]);
        out.push(Segment::Protected(protector.protect(BlockKind::Table, rendered)));
        copied = table_end;
        i = end;
    }

    push_inline(&mut out, &text[copied..]);
    out
}

/// Byte spans of each line's content, excluding the line terminator.
fn line_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        spans.push((start, start + content.len()));
        start += line.len();
    }
    spans
}

fn push_inline<'a>(out: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        out.push(Segment::Inline(text));
    }
}
