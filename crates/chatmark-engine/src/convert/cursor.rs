/// A byte cursor over converter input.
///
/// Used by the comment and block scanners, which work on raw text before
/// the inline token passes run.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Current byte index into `s`. Always on a char boundary.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// The unconsumed remainder.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Absolute index of the next occurrence of `pat` at or after the cursor.
    pub fn find(&self, pat: &str) -> Option<usize> {
        self.rest().find(pat).map(|offset| self.i + offset)
    }

    /// Moves to an absolute index.
    pub fn seek(&mut self, i: usize) {
        self.i = i;
    }

    /// Consumes characters while `pred` holds, returning them.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.i;
        let len: usize = self
            .rest()
            .chars()
            .take_while(|&c| pred(c))
            .map(char::len_utf8)
            .sum();
        self.i += len;
        &self.s[start..self.i]
    }

    /// Consumes a line ending (`\n` or `\r\n`) if one is next.
    pub fn eat_newline(&mut self) -> bool {
        if self.starts_with("\n") {
            self.i += 1;
            true
        } else if self.starts_with("\r\n") {
            self.i += 2;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert!(cur.starts_with("he"));
        cur.seek(5);
        assert_eq!(cur.rest(), "");
    }

    #[test]
    fn find_is_absolute() {
        let mut cur = Cursor::new("a */ b */");
        assert_eq!(cur.find("*/"), Some(2));
        cur.seek(3);
        assert_eq!(cur.find("*/"), Some(7));
        cur.seek(8);
        assert_eq!(cur.find("*/"), None);
    }

    #[test]
    fn eat_while_handles_multibyte() {
        let mut cur = Cursor::new("пример_1\nrest");
        assert_eq!(cur.eat_while(|c| c.is_alphanumeric() || c == '_'), "пример_1");
        assert!(cur.eat_newline());
        assert_eq!(cur.rest(), "rest");
    }

    #[test]
    fn eat_newline_crlf() {
        let mut cur = Cursor::new("\r\nx");
        assert!(cur.eat_newline());
        assert_eq!(cur.rest(), "x");
        assert!(!cur.eat_newline());
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert_eq!(cur.rest(), "");
        assert_eq!(cur.find("x"), None);
    }
}
