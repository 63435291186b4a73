//! # Lexer - Tokenizing LLM Markdown
//!
//! Breaks raw model output into tokens using the [Logos] lexer generator.
//! This is the front half of the converter's inline stage: every rewrite
//! rule (bold, italic, strikethrough, links, spoilers, inline code) is
//! expressed over this token stream rather than over the raw string.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token.** Nothing is
//! skipped, so a construct that fails to match can always fall back to its
//! literal text:
//!
//! ```
//! use chatmark_syntax::lexer::lex;
//!
//! let input = "**bold** and [a](b)\n";
//! let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are minimal and context-free. The lexer does not know whether `*`
//! is bold, italic or a stray asterisk; the inline passes decide. Each
//! delimiter character is its own token, so `**` is two `Star` tokens.
//! Everything else is grouped into `Text` runs.

use std::ops::Range;

use logos::Logos;

/// Token kinds of the source dialect.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// `*` for bold and italic
    #[token("*")]
    Star,

    /// `_` for bold and italic
    #[token("_")]
    Underscore,

    /// `~` for strikethrough
    #[token("~")]
    Tilde,

    /// `|` for spoilers
    #[token("|")]
    Pipe,

    /// Single backtick for inline code
    #[token("`")]
    Backtick,

    /// `[` opening a link label
    #[token("[")]
    LBracket,

    /// `]` closing a link label
    #[token("]")]
    RBracket,

    /// `(` opening a link target
    #[token("(")]
    LParen,

    /// `)` closing a link target
    #[token(")")]
    RParen,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\r\n*_~|`\[\]()]+")]
    Text,
}

/// A lexed token with its kind, text slice and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        // A lone `\r` is the only thing no rule accepts; keep it as text
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            span: lexer.span(),
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_plain_text_is_one_run() {
        let tokens = lex("hello, world!");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].span, 0..13);
    }

    #[test]
    fn lex_bold_markers() {
        use TokenKind::*;
        assert_eq!(kinds("**x**"), vec![Star, Star, Text, Star, Star]);
        assert_eq!(
            kinds("__x__"),
            vec![Underscore, Underscore, Text, Underscore, Underscore]
        );
    }

    #[test]
    fn lex_link() {
        use TokenKind::*;
        assert_eq!(
            kinds("[text](url)"),
            vec![LBracket, Text, RBracket, LParen, Text, RParen]
        );
    }

    #[test]
    fn lex_spoiler_and_strike() {
        use TokenKind::*;
        assert_eq!(kinds("||a||"), vec![Pipe, Pipe, Text, Pipe, Pipe]);
        assert_eq!(kinds("~~a~~"), vec![Tilde, Tilde, Text, Tilde, Tilde]);
    }

    #[test]
    fn lex_newlines() {
        use TokenKind::*;
        assert_eq!(kinds("a\nb\r\nc"), vec![Text, Newline, Text, Newline, Text]);
    }

    #[test]
    fn lone_carriage_return_is_text() {
        let tokens = lex("a\rb");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(reconstructed, "a\rb");
    }

    #[test]
    fn all_bytes_preserved_complex() {
        let input = "Привет *мир* `code` [l](http://x.y/a_b) ~~s~~ ||sp|| <tag> & done\n";
        let tokens = lex(input);
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
        for token in &tokens {
            assert_eq!(token.text, &input[token.span.clone()]);
        }
    }
}
