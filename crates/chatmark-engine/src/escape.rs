//! Escaping for the two contexts the converter writes into.

use std::borrow::Cow;

/// Escapes `&`, `<` and `>` so text renders literally in Telegram HTML.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escapes a value for a double-quoted attribute such as `href`.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
