use chatmark_engine::{
    ChunkLimit, LengthMetric, chunk::stack::OpenTagStack, convert, render, split, split_with,
};
use chatmark_syntax::{MarkupKind, Tag, lex_markup};
use pretty_assertions::assert_eq;

const LIMITS: &[usize] = &[80, 160, 400, 4096];

/// Every visible character together with the markup of the tags enclosing it.
///
/// Whitespace is skipped here; `pre_text` compares it exactly inside `<pre>`.
fn styled_text(markup: &str) -> Vec<(String, String)> {
    let mut stack = OpenTagStack::new();
    let mut out = Vec::new();
    for token in lex_markup(markup) {
        match token.kind {
            MarkupKind::Text => out.extend(
                token
                    .text
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| (c.to_string(), stack.opening_markup())),
            ),
            MarkupKind::Entity => out.push((token.text.to_string(), stack.opening_markup())),
            MarkupKind::Open(_) | MarkupKind::Close(_) => {
                stack.apply(std::slice::from_ref(&token));
            }
        }
    }
    out
}

/// The exact text inside `<pre>` blocks, whitespace included.
fn pre_text(markup: &str) -> String {
    let mut stack = OpenTagStack::new();
    let mut out = String::new();
    for token in lex_markup(markup) {
        match token.kind {
            MarkupKind::Text | MarkupKind::Entity => {
                if stack.contains(Tag::Pre) {
                    out.push_str(token.text);
                }
            }
            MarkupKind::Open(_) | MarkupKind::Close(_) => {
                stack.apply(std::slice::from_ref(&token));
            }
        }
    }
    out
}

fn assert_balanced(chunk: &str) {
    let mut open: Vec<Tag> = Vec::new();
    for token in lex_markup(chunk) {
        match token.kind {
            MarkupKind::Open(tag) => open.push(tag),
            MarkupKind::Close(tag) => assert_eq!(open.pop(), Some(tag), "in {chunk:?}"),
            MarkupKind::Entity | MarkupKind::Text => {}
        }
    }
    assert!(open.is_empty(), "unclosed {open:?} in {chunk:?}");
}

fn assert_chunk_invariants(converted: &str, chunks: &[String], limit: ChunkLimit) {
    for chunk in chunks {
        let len = limit.measure(chunk);
        assert!(len <= limit.max_length(), "chunk of {len} over {limit:?}: {chunk:?}");
        assert_balanced(chunk);
    }
    let rejoined: Vec<_> = chunks.iter().flat_map(|c| styled_text(c)).collect();
    assert_eq!(rejoined, styled_text(converted));
    let rejoined_pre: String = chunks.iter().map(|c| pre_text(c)).collect();
    assert_eq!(rejoined_pre, pre_text(converted));
}

fn fixture_test(name: &str) {
    let md = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let converted = convert(&md);
    assert_balanced(&converted);

    for &max in LIMITS {
        for metric in [LengthMetric::Chars, LengthMetric::Utf16] {
            let limit = ChunkLimit::new(max).unwrap().with_metric(metric);
            let chunks = split_with(&converted, limit).unwrap();
            assert_chunk_invariants(&converted, &chunks, limit);
            if limit.measure(&converted) <= max {
                assert_eq!(chunks, vec![converted.clone()]);
            }
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/fixture_tests.rs"));

#[test]
fn carried_over_bold_keeps_exactly_the_bold_text() {
    let bold = "word ".repeat(30);
    let converted = convert(&format!("Before. **{}end**", bold));
    let chunks = split(&converted, 60).unwrap();

    assert!(chunks.len() > 2);
    assert!(chunks[1].ends_with("</b>"));
    assert!(chunks[2].starts_with("<b>"));

    let bolded: String = chunks
        .iter()
        .flat_map(|c| styled_text(c))
        .filter(|(_, tags)| tags == "<b>")
        .map(|(c, _)| c)
        .collect();
    assert_eq!(bolded, format!("{}end", "word".repeat(30)));
}

#[test]
fn oversized_code_block_becomes_several_pre_chunks() {
    let code: String = (0..40).map(|i| format!("let v{i} = {i};\n")).collect();
    let chunks = render(&format!("```\n{code}```"), ChunkLimit::new(100).unwrap()).unwrap();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.starts_with("<pre>") && chunk.ends_with("</pre>"), "{chunk:?}");
        assert!(chunk.ends_with(";\n</pre>"), "line split mid-way: {chunk:?}");
    }
    let rejoined: String = chunks
        .iter()
        .map(|c| c.trim_start_matches("<pre>").trim_end_matches("</pre>"))
        .collect();
    assert_eq!(rejoined, code);
}

#[test]
fn blank_lines_in_a_split_code_block_survive() {
    let code = format!("fn a() {{}}\n{}fn b() {{}}\n", "\n".repeat(15));
    let chunks = render(&format!("```\n{code}```"), ChunkLimit::new(24).unwrap()).unwrap();

    assert!(chunks.len() > 2);
    assert!(chunks.contains(&format!("<pre>{}</pre>", "\n".repeat(12))));
    let rejoined: String = chunks.iter().map(|c| pre_text(c)).collect();
    assert_eq!(rejoined, code);
}

#[test]
fn telegram_limit_counts_utf16() {
    let converted = convert(&"🚀".repeat(3000));
    let chunks = split_with(&converted, ChunkLimit::telegram()).unwrap();
    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.encode_utf16().count() <= 4096));
}
