use std::ops::Range;

use chatmark_syntax::{MarkupKind, MarkupToken, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Running text, split at sentence and word boundaries when needed.
    Text,
    /// A `<pre>` block, kept whole unless it alone exceeds the limit.
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub range: Range<usize>,
}

/// Partitions converter output into text and `<pre>` block segments.
///
/// The segments cover the input without gaps. A `<pre>` with no closing
/// tag is left inside the surrounding text segment.
pub fn segment(tokens: &[MarkupToken<'_>], len: usize) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut block_start = None;
    let mut depth = 0usize;

    for token in tokens {
        match token.kind {
            MarkupKind::Open(Tag::Pre) => {
                if depth == 0 {
                    block_start = Some(token.span.start);
                }
                depth += 1;
            }
            MarkupKind::Close(Tag::Pre) if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(start) = block_start.take()
                {
                    push(&mut out, SegmentKind::Text, text_start..start);
                    push(&mut out, SegmentKind::Block, start..token.span.end);
                    text_start = token.span.end;
                }
            }
            _ => {}
        }
    }

    push(&mut out, SegmentKind::Text, text_start..len);
    out
}

fn push(out: &mut Vec<Segment>, kind: SegmentKind, range: Range<usize>) {
    if !range.is_empty() {
        out.push(Segment { kind, range });
    }
}
