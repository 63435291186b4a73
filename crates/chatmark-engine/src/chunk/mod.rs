//! # Chunker
//!
//! Splits converted markup into ordered chunks that each fit the length
//! limit and each have balanced tags on their own.
//!
//! The input is first partitioned into running text and `<pre>` blocks
//! ([`segment`]). Segments are then packed greedily by a builder that
//! tracks open tags ([`stack`]): when a chunk has to end, it is closed with
//! synthetic closing tags and the next chunk reopens the same tags, anchors
//! with their original `href`. Pieces that do not fit a fresh chunk are cut
//! at progressively finer [`boundary`] levels:
//!
//! ```text
//! text:   sentences ─▶ lines ─▶ words ─▶ single characters
//! <pre>:               lines ─▶ words ─▶ single characters
//! ```
//!
//! Cuts never fall inside a tag or an entity.

pub mod boundary;
mod builder;
pub mod segment;
pub mod stack;

use chatmark_syntax::lex_markup;
use thiserror::Error;

use crate::metric::ChunkLimit;
use boundary::{BLOCK_LEVELS, TEXT_LEVELS};
use builder::ChunkBuilder;
use segment::SegmentKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk length limit must be positive")]
    ZeroLimit,

    #[error(
        "chunk length limit {max_length} is too small: \
         the smallest unsplittable piece needs {needed}"
    )]
    BudgetTooSmall { needed: usize, max_length: usize },
}

/// Splits `marked_up` into chunks of at most `max_length` characters.
///
/// Input that already fits is returned as a single unchanged chunk.
///
/// ```
/// use chatmark_engine::chunk::split;
///
/// let chunks = split("<b>one two three</b>", 14).unwrap();
/// assert_eq!(chunks, vec!["<b>one </b>", "<b>two </b>", "<b>three</b>"]);
/// ```
pub fn split(marked_up: &str, max_length: usize) -> Result<Vec<String>, ChunkError> {
    split_with(marked_up, ChunkLimit::new(max_length)?)
}

/// Like [`split`], measuring length with the limit's metric.
pub fn split_with(marked_up: &str, limit: ChunkLimit) -> Result<Vec<String>, ChunkError> {
    if limit.measure(marked_up) <= limit.max_length() {
        return Ok(vec![marked_up.to_string()]);
    }

    let tokens = lex_markup(marked_up);
    let segments = segment::segment(&tokens, marked_up.len());
    log::debug!(
        "splitting {} {} with limit {} across {} segments",
        limit.measure(marked_up),
        limit.metric(),
        limit.max_length(),
        segments.len()
    );

    let mut builder = ChunkBuilder::new(marked_up, limit);
    for segment in segments {
        let levels = match segment.kind {
            SegmentKind::Text => TEXT_LEVELS,
            SegmentKind::Block => BLOCK_LEVELS,
        };
        builder.pack(segment.range, levels)?;
    }

    let chunks = builder.finish();
    log::debug!("produced {} chunks", chunks.len());
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::LengthMetric;
    use chatmark_syntax::{MarkupKind, Tag};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn assert_balanced(chunk: &str) {
        let mut open: Vec<Tag> = Vec::new();
        for token in lex_markup(chunk) {
            match token.kind {
                MarkupKind::Open(tag) => open.push(tag),
                MarkupKind::Close(tag) => assert_eq!(open.pop(), Some(tag), "in {chunk:?}"),
                _ => {}
            }
        }
        assert!(open.is_empty(), "unclosed {open:?} in {chunk:?}");
    }

    #[test]
    fn fast_path_returns_input_unchanged() {
        let input = "<b>short</b> and   sweet\n\n";
        assert_eq!(split(input, input.len()).unwrap(), vec![input]);
        assert_eq!(split("", 1).unwrap(), vec![""]);
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(split("anything", 0), Err(ChunkError::ZeroLimit));
    }

    #[test]
    fn sentences_are_kept_together() {
        let chunks = split("First one. Second one. Third one.", 24).unwrap();
        assert_eq!(chunks, vec!["First one. Second one. ", "Third one."]);
    }

    #[test]
    fn bold_carries_over_a_split() {
        let chunks = split("<b>aaaa bbbb cccc</b>", 17).unwrap();
        assert_eq!(chunks, vec!["<b>aaaa bbbb </b>", "<b>cccc</b>"]);
        assert!(chunks[0].ends_with("</b>"));
        assert!(chunks[1].starts_with("<b>"));
    }

    #[test]
    fn anchor_reopens_with_its_href() {
        let input = "<a href=\"https://x.io\">one two</a>";
        let chunks = split(input, 32).unwrap();
        assert_eq!(
            chunks,
            vec![
                "<a href=\"https://x.io\">one </a>",
                "<a href=\"https://x.io\">two</a>"
            ]
        );
    }

    #[test]
    fn block_moves_whole_to_a_fresh_chunk() {
        let input = "Intro text.\n<pre>line 1\nline 2\n</pre>";
        let chunks = split(input, 30).unwrap();
        assert_eq!(chunks, vec!["Intro text.\n", "<pre>line 1\nline 2\n</pre>"]);
    }

    #[test]
    fn oversized_block_is_split_by_lines_and_rewrapped() {
        let body: String = (0..6).map(|i| format!("row {i}\n")).collect();
        let input = format!("<pre>{body}</pre>");
        let chunks = split(&input, 24).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 24, "{chunk:?}");
            assert!(chunk.starts_with("<pre>") && chunk.ends_with("</pre>"), "{chunk:?}");
            assert_balanced(chunk);
        }
        let rejoined: String = chunks
            .iter()
            .map(|c| c.trim_start_matches("<pre>").trim_end_matches("</pre>"))
            .collect();
        assert_eq!(rejoined, body);
    }

    #[test]
    fn blank_lines_inside_a_split_block_are_kept() {
        let chunks = split("<pre>aaaa\n\n\nbbbb</pre>", 16).unwrap();
        assert_eq!(
            chunks,
            vec!["<pre>aaaa\n</pre>", "<pre>\n\n</pre>", "<pre>bbbb</pre>"]
        );
        let rejoined: String = chunks
            .iter()
            .map(|c| c.trim_start_matches("<pre>").trim_end_matches("</pre>"))
            .collect();
        assert_eq!(rejoined, "aaaa\n\n\nbbbb");
    }

    #[test]
    fn whitespace_only_chunks_are_dropped() {
        let input = format!("{}\n\n\n\n\n\n{}", "a".repeat(8), "b".repeat(8));
        let chunks = split(&input, 9).unwrap();
        assert_eq!(chunks, vec!["aaaaaaaa\n", "bbbbbbbb"]);
    }

    #[test]
    fn unsplittable_piece_reports_budget() {
        let input = "<b>x</b><a href=\"https://example.com/long\">y</a>";
        assert_eq!(
            split(input, 10),
            Err(ChunkError::BudgetTooSmall {
                needed: 39,
                max_length: 10
            })
        );
    }

    #[test]
    fn entities_are_never_cut() {
        let chunks = split("&amp;&amp;&amp;", 9).unwrap();
        assert_eq!(chunks, vec!["&amp;", "&amp;", "&amp;"]);
    }

    #[test]
    fn utf16_metric_counts_surrogate_pairs() {
        let limit = ChunkLimit::new(4).unwrap().with_metric(LengthMetric::Utf16);
        let chunks = split_with("😀😀😀", limit).unwrap();
        assert_eq!(chunks, vec!["😀😀", "😀"]);
    }

    #[rstest]
    #[case(48)]
    #[case(64)]
    #[case(100)]
    #[case(160)]
    fn every_chunk_fits_and_balances(#[case] max: usize) {
        let input = "Plain <b>bold <i>both</i> more bold</b>. Then <s>struck</s> and \
                     <a href=\"https://e.io/p?q=1&amp;r=2\">a link</a>!\n\
                     <pre>let x = 1;\nlet y = 2;\n</pre>\n\
                     <tg-spoiler>secret words</tg-spoiler> &lt;end&gt;";
        let chunks = split(input, max).unwrap();
        for chunk in &chunks {
            assert!(chunk.chars().count() <= max, "{chunk:?} > {max}");
            assert_balanced(chunk);
        }
    }
}
