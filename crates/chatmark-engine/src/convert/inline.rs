//! # Inline Passes
//!
//! Rewrites inline Markdown in one [`Segment::Inline`] piece of text.
//!
//! The text is lexed once into a node stream. Each rule below is then a
//! transformation of that stream, applied in this order:
//!
//! | Pass | Source | Output |
//! |------|--------|--------|
//! | inline code | `` `x` `` | `<code>x</code>` (opaque from here on) |
//! | bold | `**x**`, then `__x__` | `<b>x</b>` |
//! | italic | `*x*`, then `_x_` | `<i>x</i>` |
//! | strikethrough | `~~x~~` | `<s>x</s>` |
//! | link | `[label](url)` | `<a href="url">label</a>` |
//! | spoiler | `\|\|x\|\|` | `<tg-spoiler>x</tg-spoiler>` |
//!
//! ## Matching Rules
//!
//! - The content between delimiters is non-empty and ends at the first
//!   delimiter of the same kind (`**a*b**` is not bold). Spoilers end at the
//!   first `||` and may not cross a line break.
//! - Matches never overlap, and scanning resumes after a match.
//! - A pair only matches when the content between its delimiters is itself
//!   tag-balanced, so tags from different passes always nest.
//! - `_` only opens after a non-alphanumeric character and only closes
//!   before one, so `snake_case_name` stays literal.
//! - A link target is taken from the source text and attribute-escaped.
//!   Delimiters consumed inside it by earlier passes are restored.
//!
//! Anything left unmatched renders as its literal, escaped text.
//!
//! [`Segment::Inline`]: super::blocks::Segment::Inline

use std::ops::Range;

use chatmark_syntax::{Tag, TokenKind, lex};

use crate::escape::{escape_attr, escape_text};

#[derive(Debug, Clone)]
enum Node {
    /// A source token no construct has claimed yet.
    Token { kind: TokenKind, span: Range<usize> },
    /// Opening markup that replaced a delimiter run.
    Open {
        tag: Tag,
        markup: String,
        span: Range<usize>,
    },
    Close { tag: Tag, span: Range<usize> },
    /// Rendered markup no later pass may look into.
    Opaque {
        rendered: String,
        span: Range<usize>,
    },
}

impl Node {
    fn span(&self) -> &Range<usize> {
        match self {
            Node::Token { span, .. }
            | Node::Open { span, .. }
            | Node::Close { span, .. }
            | Node::Opaque { span, .. } => span,
        }
    }

    fn is(&self, want: TokenKind) -> bool {
        matches!(self, Node::Token { kind, .. } if *kind == want)
    }
}

/// A paired-delimiter rule such as `**bold**`.
#[derive(Debug, Clone, Copy)]
struct Rule {
    delim: TokenKind,
    width: usize,
    tag: Tag,
    /// Content may include single delimiter tokens and ends at the first
    /// full delimiter run; it may not cross a line break.
    lazy_single_line: bool,
    /// Delimiters must not touch alphanumerics on their outer side.
    word_bounded: bool,
}

impl Rule {
    const fn new(delim: TokenKind, width: usize, tag: Tag) -> Self {
        Self {
            delim,
            width,
            tag,
            lazy_single_line: false,
            word_bounded: false,
        }
    }

    const fn word_bounded(mut self) -> Self {
        self.word_bounded = true;
        self
    }

    const fn lazy_single_line(mut self) -> Self {
        self.lazy_single_line = true;
        self
    }
}

const BOLD_STAR: Rule = Rule::new(TokenKind::Star, 2, Tag::Bold);
const BOLD_UNDERSCORE: Rule = Rule::new(TokenKind::Underscore, 2, Tag::Bold).word_bounded();
const ITALIC_STAR: Rule = Rule::new(TokenKind::Star, 1, Tag::Italic);
const ITALIC_UNDERSCORE: Rule = Rule::new(TokenKind::Underscore, 1, Tag::Italic).word_bounded();
const STRIKE: Rule = Rule::new(TokenKind::Tilde, 2, Tag::Strike);
const SPOILER: Rule = Rule::new(TokenKind::Pipe, 2, Tag::Spoiler).lazy_single_line();

/// Converts one inline segment of source text to markup.
pub fn convert_inline(src: &str) -> String {
    let mut inline = Inline::new(src);
    inline.code_spans();
    for rule in [BOLD_STAR, BOLD_UNDERSCORE, ITALIC_STAR, ITALIC_UNDERSCORE, STRIKE] {
        inline.pair(rule);
    }
    inline.links();
    inline.pair(SPOILER);
    inline.render()
}

struct Inline<'a> {
    src: &'a str,
    nodes: Vec<Node>,
}

impl<'a> Inline<'a> {
    fn new(src: &'a str) -> Self {
        let nodes = lex(src)
            .into_iter()
            .map(|t| Node::Token {
                kind: t.kind,
                span: t.span,
            })
            .collect();
        Self { src, nodes }
    }

    /// Source text covered by `nodes[range]`.
    fn source(&self, range: Range<usize>) -> &'a str {
        if range.is_empty() {
            return "";
        }
        &self.src[self.covering(range)]
    }

    fn covering(&self, range: Range<usize>) -> Range<usize> {
        self.nodes[range.start].span().start..self.nodes[range.end - 1].span().end
    }

    /// `` `code` `` → opaque `<code>` nodes.
    fn code_spans(&mut self) {
        let mut i = 0;
        while i < self.nodes.len() {
            if !self.nodes[i].is(TokenKind::Backtick) {
                i += 1;
                continue;
            }
            let close =
                (i + 1..self.nodes.len()).find(|&j| self.nodes[j].is(TokenKind::Backtick));
            match close {
                Some(j) if j > i + 1 => {
                    let rendered = format!(
                        "{}{}{}",
                        Tag::Code.open(),
                        escape_text(self.source(i + 1..j)),
                        Tag::Code.close()
                    );
                    let span = self.covering(i..j + 1);
                    self.nodes.splice(i..=j, [Node::Opaque { rendered, span }]);
                    i += 1;
                }
                Some(_) => i += 1,
                None => break,
            }
        }
    }

    /// Applies one paired-delimiter rule across the stream.
    fn pair(&mut self, rule: Rule) {
        let mut i = 0;
        while i + rule.width <= self.nodes.len() {
            if let Some(close) = self.match_at(i, rule) {
                self.wrap(i, close, rule.width, rule.tag, rule.tag.open());
                // The closing node now sits `width - 1` places earlier
                i = close - (rule.width - 1) + 1;
            } else {
                i += 1;
            }
        }
    }

    /// Index of the closing delimiter run for an opening run at `i`.
    fn match_at(&self, i: usize, rule: Rule) -> Option<usize> {
        if !self.run_at(i, rule) {
            return None;
        }
        if rule.word_bounded && self.char_before(i).is_some_and(char::is_alphanumeric) {
            return None;
        }

        let content_start = i + rule.width;
        let mut j = content_start;
        let close = loop {
            let node = self.nodes.get(j)?;
            if rule.lazy_single_line {
                if node.is(TokenKind::Newline) {
                    return None;
                }
                if j > content_start && self.run_at(j, rule) {
                    break j;
                }
            } else if node.is(rule.delim) {
                // Content ends at the first delimiter token
                if j > content_start && self.run_at(j, rule) {
                    break j;
                }
                return None;
            }
            j += 1;
        };

        let after = close + rule.width - 1;
        if rule.word_bounded && self.char_after(after).is_some_and(char::is_alphanumeric) {
            return None;
        }
        balanced(&self.nodes[content_start..close]).then_some(close)
    }

    fn run_at(&self, i: usize, rule: Rule) -> bool {
        i + rule.width <= self.nodes.len()
            && self.nodes[i..i + rule.width].iter().all(|n| n.is(rule.delim))
    }

    fn char_before(&self, node: usize) -> Option<char> {
        self.src[..self.nodes[node].span().start].chars().next_back()
    }

    fn char_after(&self, node: usize) -> Option<char> {
        self.src[self.nodes[node].span().end..].chars().next()
    }

    /// Replaces the delimiter runs at `open` and `close` with tag nodes.
    fn wrap(&mut self, open: usize, close: usize, width: usize, tag: Tag, markup: String) {
        let close_span = self.covering(close..close + width);
        let close_node = Node::Close {
            tag,
            span: close_span,
        };
        self.nodes.splice(close..close + width, [close_node]);
        let open_span = self.covering(open..open + width);
        let open_node = Node::Open {
            tag,
            markup,
            span: open_span,
        };
        self.nodes.splice(open..open + width, [open_node]);
    }

    /// `[label](url)` → anchors.
    fn links(&mut self) {
        let mut i = 0;
        while i < self.nodes.len() {
            match self.link_at(i) {
                Some((label_end, url_end)) => {
                    let href = escape_attr(self.source(label_end + 2..url_end)).into_owned();
                    let close_span = self.covering(label_end..url_end + 1);
                    let close = Node::Close {
                        tag: Tag::Anchor,
                        span: close_span,
                    };
                    self.nodes.splice(label_end..=url_end, [close]);
                    let open_span = self.nodes[i].span().clone();
                    self.nodes[i] = Node::Open {
                        tag: Tag::Anchor,
                        markup: Tag::open_anchor(&href),
                        span: open_span,
                    };
                    i = label_end + 1;
                }
                None => i += 1,
            }
        }
    }

    /// For a `[` at `i`, the indices of the `]` and the closing `)`.
    fn link_at(&self, i: usize) -> Option<(usize, usize)> {
        if !self.nodes[i].is(TokenKind::LBracket) {
            return None;
        }
        let label_end =
            (i + 1..self.nodes.len()).find(|&j| self.nodes[j].is(TokenKind::RBracket))?;
        if label_end == i + 1 || !self.nodes.get(label_end + 1)?.is(TokenKind::LParen) {
            return None;
        }
        let url_start = label_end + 2;
        let url_end =
            (url_start..self.nodes.len()).find(|&j| self.nodes[j].is(TokenKind::RParen))?;
        if url_end == url_start {
            return None;
        }
        // Tags inside the target are flattened back to source text, which
        // is only safe when none of them pair with a tag outside it
        (balanced(&self.nodes[i + 1..label_end]) && balanced(&self.nodes[url_start..url_end]))
            .then_some((label_end, url_end))
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(self.src.len());
        for node in &self.nodes {
            match node {
                Node::Token { span, .. } => out.push_str(&escape_text(&self.src[span.clone()])),
                Node::Open { markup, .. } => out.push_str(markup),
                Node::Close { tag, .. } => out.push_str(&tag.close()),
                Node::Opaque { rendered, .. } => out.push_str(rendered),
            }
        }
        out
    }
}

/// True when every `Open` in `nodes` is closed, in order, within `nodes`.
fn balanced(nodes: &[Node]) -> bool {
    let mut stack = Vec::new();
    for node in nodes {
        match node {
            Node::Open { tag, .. } => stack.push(*tag),
            Node::Close { tag, .. } => {
                if stack.pop() != Some(*tag) {
                    return false;
                }
            }
            Node::Token { .. } | Node::Opaque { .. } => {}
        }
    }
    stack.is_empty()
}
