//! # Converter
//!
//! Turns model-written Markdown into Telegram-safe HTML.
//!
//! ## Pipeline
//!
//! ```text
//! raw ─▶ strip /* comments */ ─▶ extract ``` code ``` ─▶ extract | tables |
//!     ─▶ inline passes (per inline segment) ─▶ concatenate in order
//! ```
//!
//! Code blocks and tables are rendered as soon as they are extracted and
//! kept out of the inline passes entirely (see [`blocks`]). Inline code is
//! made opaque by the first inline pass (see [`inline`]). Nothing is ever
//! rewritten twice, and nothing is reported as an error: input that matches
//! no rule is emitted as escaped literal text.
//!
//! ## Modules
//!
//! - **`comments`**: `/* ... */` removal
//! - **`cursor`**: byte cursor for the raw-text scanners
//! - **`blocks`**: fenced code and table extraction into [`ProtectedBlock`]s
//! - **`table`**: pipe-table parsing and fixed-width rendering
//! - **`inline`**: token-stream passes for inline formatting

pub mod blocks;
pub mod comments;
pub mod cursor;
pub mod inline;
pub mod table;

pub use blocks::{BlockKind, ProtectedBlock, Segment};

use blocks::Protector;
use comments::strip_comments;
use inline::convert_inline;

/// Converts raw Markdown-like text into the restricted HTML dialect.
///
/// Total over all input: malformed or unmatched constructs fall back to
/// escaped literal text, and every emitted tag is closed.
pub fn convert(raw: &str) -> String {
    let stripped = strip_comments(raw);
    let mut protector = Protector::default();
    let segments = blocks::extract(&stripped, &mut protector);
    log::debug!(
        "converting {} bytes: {} segments, {} protected blocks",
        raw.len(),
        segments.len(),
        protector.count()
    );

    let mut out = String::with_capacity(stripped.len() + stripped.len() / 8);
    for segment in segments {
        match segment {
            Segment::Inline(text) => out.push_str(&convert_inline(text)),
            Segment::Protected(block) => out.push_str(&block.rendered),
        }
    }
    out
}
