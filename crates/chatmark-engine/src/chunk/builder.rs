use std::{mem, ops::Range};

use chatmark_syntax::{MarkupKind, Tag, lex_markup};

use super::{
    ChunkError,
    boundary::{self, Level},
    stack::OpenTagStack,
};
use crate::metric::ChunkLimit;

/// Greedy chunk assembly with open-tag carry-over.
///
/// Every append is checked against the budget *including* the synthetic
/// closing tags the chunk would need if it ended right there, so a flush
/// can never push a chunk over the limit.
pub(crate) struct ChunkBuilder<'a> {
    src: &'a str,
    limit: ChunkLimit,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
    stack: OpenTagStack,
    /// Something beyond the reopened prefix has been appended.
    has_body: bool,
    /// The body contains non-whitespace text, an entity, or any text
    /// inside `<pre>`.
    visible: bool,
}

impl<'a> ChunkBuilder<'a> {
    pub fn new(src: &'a str, limit: ChunkLimit) -> Self {
        Self {
            src,
            limit,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
            stack: OpenTagStack::new(),
            has_body: false,
            visible: false,
        }
    }

    /// Appends `src[range]`, refining through `levels` when it does not fit.
    ///
    /// A piece that does not fit the current chunk first gets a fresh chunk
    /// of its own; only when it does not fit that either is it split at the
    /// next level. Pieces are visited in order, so output order follows
    /// input order.
    pub fn pack(&mut self, range: Range<usize>, levels: &[Level]) -> Result<(), ChunkError> {
        let Err(needed) = self.try_append(range.clone()) else {
            return Ok(());
        };
        let needed = if self.has_body {
            self.flush();
            match self.try_append(range.clone()) {
                Ok(()) => return Ok(()),
                Err(needed) => needed,
            }
        } else {
            needed
        };

        let Some((&level, finer)) = levels.split_first() else {
            log::warn!("piece at {range:?} needs {needed}, more than a fresh chunk allows");
            return Err(ChunkError::BudgetTooSmall {
                needed,
                max_length: self.limit.max_length(),
            });
        };
        for piece in boundary::split(self.src, range, level) {
            self.pack(piece, finer)?;
        }
        Ok(())
    }

    /// Appends the piece if the chunk, closed right after it, stays within
    /// budget. On failure returns that closed length and changes nothing.
    fn try_append(&mut self, range: Range<usize>) -> Result<(), usize> {
        let piece = &self.src[range];
        let tokens = lex_markup(piece);
        let mut after = self.stack.clone();
        after.apply(&tokens);

        let piece_len = self.limit.measure(piece);
        let needed = self.current_len + piece_len + self.limit.measure(&after.closing_markup());
        if needed > self.limit.max_length() {
            return Err(needed);
        }

        // Whitespace inside <pre> is content, not padding
        let in_pre = self.stack.contains(Tag::Pre) || after.contains(Tag::Pre);
        self.visible |= tokens
            .iter()
            .any(|t| t.is_visible() || (in_pre && t.kind == MarkupKind::Text));

        self.current.push_str(piece);
        self.current_len += piece_len;
        self.stack = after;
        self.has_body = true;
        Ok(())
    }

    /// Closes the current chunk and seeds the next one with the tags that
    /// are still open.
    fn flush(&mut self) {
        if !self.has_body {
            return;
        }
        self.current.push_str(&self.stack.closing_markup());
        let chunk = mem::replace(&mut self.current, self.stack.opening_markup());
        if self.visible {
            self.chunks.push(chunk);
        } else {
            log::warn!("dropping chunk with no visible content: {chunk:?}");
        }
        self.current_len = self.limit.measure(&self.current);
        self.has_body = false;
        self.visible = false;
    }

    pub fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}
