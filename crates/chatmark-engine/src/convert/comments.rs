use std::borrow::Cow;

use super::cursor::Cursor;

pub const OPEN: &str = "/*";
pub const CLOSE: &str = "*/";

/// Removes `/* ... */` comments. Each comment ends at the first `*/`
/// after it opens and may span lines. An unterminated `/*` is kept as text.
pub fn strip_comments(input: &str) -> Cow<'_, str> {
    let mut cur = Cursor::new(input);
    let mut out = String::new();
    let mut copied = 0;

    while let Some(start) = cur.find(OPEN) {
        cur.seek(start + OPEN.len());
        let Some(end) = cur.find(CLOSE) else {
            break;
        };
        out.push_str(&input[copied..start]);
        copied = end + CLOSE.len();
        cur.seek(copied);
    }

    if copied == 0 {
        return Cow::Borrowed(input);
    }
    out.push_str(&input[copied..]);
    Cow::Owned(out)
}
