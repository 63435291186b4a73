//! # Markup Lexer - Tokenizing the Output Dialect
//!
//! The chunker reads converter output back in order to keep tags balanced
//! across chunk boundaries. This lexer splits that output into
//! [`MarkupToken`]s: opening tags, closing tags, character entities, and
//! runs of plain text.
//!
//! Only the closed [`Tag`] set is recognised. Any other `<...>` or stray
//! `&` is opaque plain text, which keeps the chunker total over malformed
//! input. Like the source lexer this one is lossless:
//!
//! ```
//! use chatmark_syntax::markup::{lex_markup, MarkupKind};
//! use chatmark_syntax::Tag;
//!
//! let tokens = lex_markup("<b>x &amp; y</b>");
//! assert_eq!(tokens[0].kind, MarkupKind::Open(Tag::Bold));
//! assert_eq!(tokens.last().unwrap().kind, MarkupKind::Close(Tag::Bold));
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(reconstructed, "<b>x &amp; y</b>");
//! ```

use std::ops::Range;

use logos::Logos;

use crate::tag::Tag;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    #[regex(r"<(b|i|s|code|pre|tg-spoiler)>")]
    OpenPlain,

    #[regex(r#"<a href="[^"<>]*">"#)]
    OpenAnchor,

    #[regex(r"</(b|i|s|code|pre|a|tg-spoiler)>")]
    Close,

    #[regex(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);")]
    Entity,

    #[regex(r"[^<&]+")]
    Text,
}

/// What a [`MarkupToken`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    /// An opening tag. For anchors the token text carries the `href`.
    Open(Tag),
    /// A closing tag.
    Close(Tag),
    /// A character reference such as `&amp;` - one visible character.
    Entity,
    /// Plain text, including unrecognised angle-bracket text.
    Text,
}

/// A lexical unit of the output dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupToken<'a> {
    pub kind: MarkupKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

impl MarkupToken<'_> {
    /// The tag this token opens or closes, if any.
    pub fn tag(&self) -> Option<Tag> {
        match self.kind {
            MarkupKind::Open(tag) | MarkupKind::Close(tag) => Some(tag),
            MarkupKind::Entity | MarkupKind::Text => None,
        }
    }

    /// True for tokens that render as visible, non-whitespace content.
    pub fn is_visible(&self) -> bool {
        match self.kind {
            MarkupKind::Entity => true,
            MarkupKind::Text => !self.text.trim().is_empty(),
            MarkupKind::Open(_) | MarkupKind::Close(_) => false,
        }
    }
}

/// Tokenize converter output.
pub fn lex_markup(input: &str) -> Vec<MarkupToken<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = RawKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let kind = match result {
            Ok(RawKind::OpenPlain) => {
                tag_between(text, 1).map_or(MarkupKind::Text, MarkupKind::Open)
            }
            Ok(RawKind::OpenAnchor) => MarkupKind::Open(Tag::Anchor),
            Ok(RawKind::Close) => {
                tag_between(text, 2).map_or(MarkupKind::Text, MarkupKind::Close)
            }
            Ok(RawKind::Entity) => MarkupKind::Entity,
            // Unrecognised `<` or `&` is plain text
            Ok(RawKind::Text) | Err(()) => MarkupKind::Text,
        };
        tokens.push(MarkupToken {
            kind,
            text,
            span: lexer.span(),
        });
    }

    tokens
}

/// Resolves the tag named between `prefix_len` bytes of `<` or `</` and the
/// trailing `>`.
fn tag_between(text: &str, prefix_len: usize) -> Option<Tag> {
    text.get(prefix_len..text.len().saturating_sub(1))
        .and_then(Tag::from_name)
}
