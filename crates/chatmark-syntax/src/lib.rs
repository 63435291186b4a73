//! # chatmark-syntax
//!
//! Tokenizers for both ends of the chatmark pipeline, built on [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Two Dialects
//!
//! ```text
//! LLM Markdown ──lexer──▶ Token stream ──(engine: convert)──▶ Telegram HTML
//! Telegram HTML ──markup──▶ MarkupToken stream ──(engine: split)──▶ chunks
//! ```
//!
//! - [`lexer`] tokenizes the loosely structured Markdown that a language
//!   model produces. Delimiters are single-character tokens; the converter
//!   decides what they mean.
//! - [`markup`] tokenizes the restricted HTML dialect the converter emits,
//!   so the chunker can track which tags are open at any byte offset.
//! - [`tag`] is the closed tag vocabulary shared by both sides.
//!
//! Both lexers are lossless: concatenating token texts reproduces the input
//! exactly, and unrecognised input degrades to plain text instead of failing.

pub mod lexer;
pub mod markup;
pub mod tag;

pub use lexer::{Token, TokenKind, lex};
pub use markup::{MarkupKind, MarkupToken, lex_markup};
pub use tag::Tag;
