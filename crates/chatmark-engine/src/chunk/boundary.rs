//! Candidate split points inside a piece of markup.
//!
//! Cuts are only ever placed inside plain-text tokens (or, at the atom
//! level, between tokens), so a tag or an entity like `&amp;` is never
//! broken. Each cut sits *after* its separator: the trailing space or
//! newline stays with the earlier piece.

use std::{ops::Range, sync::OnceLock};

use chatmark_syntax::{MarkupKind, lex_markup};
use regex::Regex;

/// How finely to split a piece that does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// After `.`, `!` or `?` followed by whitespace, and after blank lines.
    Sentences,
    /// After every line break.
    Lines,
    /// After every whitespace run.
    Words,
    /// Between tokens, and between characters of plain text.
    Atoms,
}

/// Refinement order for running text.
pub const TEXT_LEVELS: &[Level] = &[Level::Sentences, Level::Lines, Level::Words, Level::Atoms];

/// Refinement order for `<pre>` blocks: whole lines first.
pub const BLOCK_LEVELS: &[Level] = &[Level::Lines, Level::Words, Level::Atoms];

fn sentence_end() -> &'static Regex {
    static SENTENCE_END: OnceLock<Regex> = OnceLock::new();
    SENTENCE_END.get_or_init(|| Regex::new(r"[.!?]+\s+|\n\n+").expect("Invalid sentence regex"))
}

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"))
}

impl Level {
    /// Cut offsets inside one run of plain text.
    fn cuts_in(self, text: &str) -> Vec<usize> {
        match self {
            Level::Sentences => sentence_end().find_iter(text).map(|m| m.end()).collect(),
            Level::Lines => text.match_indices('\n').map(|(i, _)| i + 1).collect(),
            Level::Words => whitespace().find_iter(text).map(|m| m.end()).collect(),
            Level::Atoms => text.char_indices().map(|(i, _)| i).collect(),
        }
    }
}

/// Splits `src[range]` into consecutive sub-ranges at `level`.
///
/// Returns a single range when the level offers no cut.
pub fn split(src: &str, range: Range<usize>, level: Level) -> Vec<Range<usize>> {
    let base = range.start;
    let mut cuts = Vec::new();

    for token in lex_markup(&src[range.clone()]) {
        let start = base + token.span.start;
        match token.kind {
            MarkupKind::Text => {
                cuts.extend(level.cuts_in(token.text).into_iter().map(|c| start + c))
            }
            _ if level == Level::Atoms => cuts.push(start),
            _ => {}
        }
        if level == Level::Atoms {
            cuts.push(base + token.span.end);
        }
    }

    cuts.retain(|&c| c > range.start && c < range.end);
    cuts.sort_unstable();
    cuts.dedup();

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut from = range.start;
    for cut in cuts {
        pieces.push(from..cut);
        from = cut;
    }
    pieces.push(from..range.end);
    pieces
}
