use chatmark_syntax::{MarkupKind, MarkupToken, Tag};

/// An opened tag together with the exact markup that opened it, so an
/// anchor can be reopened with its original `href`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    pub tag: Tag,
    pub markup: String,
}

/// Tags opened but not yet closed in the text assembled so far.
///
/// Out-of-order closes are tolerated: a closing tag removes the most
/// recently opened entry with the same name, wherever it sits in the stack.
/// A closing tag with no matching entry is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenTagStack {
    entries: Vec<OpenTag>,
}

impl OpenTagStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Tag, markup: impl Into<String>) {
        self.entries.push(OpenTag {
            tag,
            markup: markup.into(),
        });
    }

    /// Removes the topmost entry for `tag`. Returns false when none exists.
    pub fn close(&mut self, tag: Tag) -> bool {
        match self.entries.iter().rposition(|e| e.tag == tag) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replays the opens and closes in `tokens`.
    pub fn apply(&mut self, tokens: &[MarkupToken<'_>]) {
        for token in tokens {
            match token.kind {
                MarkupKind::Open(tag) => self.push(tag, token.text),
                MarkupKind::Close(tag) => {
                    if !self.close(tag) {
                        log::debug!("ignoring unmatched {}", token.text);
                    }
                }
                MarkupKind::Entity | MarkupKind::Text => {}
            }
        }
    }

    /// Markup that reopens every entry, outermost first.
    pub fn opening_markup(&self) -> String {
        self.entries.iter().map(|e| e.markup.as_str()).collect()
    }

    /// Markup that closes every entry, innermost first.
    pub fn closing_markup(&self) -> String {
        self.entries.iter().rev().map(|e| e.tag.close()).collect()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.entries.iter().any(|e| e.tag == tag)
    }

    #[cfg(test)]
    fn tags(&self) -> Vec<Tag> {
        self.entries.iter().map(|e| e.tag).collect()
    }
}
