//! The closed set of tags in the output dialect.
//!
//! Telegram's HTML parse mode accepts a small vocabulary of paired tags. The
//! converter only ever emits these, and the chunker only tracks these: any
//! other angle-bracket text is opaque plain text.

/// A paired tag of the output dialect.
///
/// Every variant has an opening and a closing form; there are no void tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `<b>`
    Bold,
    /// `<i>`
    Italic,
    /// `<s>`
    Strike,
    /// `<code>` (inline)
    Code,
    /// `<pre>` (code blocks and rendered tables)
    Pre,
    /// `<a href="...">`
    Anchor,
    /// `<tg-spoiler>`
    Spoiler,
}

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Bold,
        Tag::Italic,
        Tag::Strike,
        Tag::Code,
        Tag::Pre,
        Tag::Anchor,
        Tag::Spoiler,
    ];

    /// The element name as it appears between the angle brackets.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Bold => "b",
            Tag::Italic => "i",
            Tag::Strike => "s",
            Tag::Code => "code",
            Tag::Pre => "pre",
            Tag::Anchor => "a",
            Tag::Spoiler => "tg-spoiler",
        }
    }

    /// Opening markup for attribute-less tags.
    ///
    /// Anchors carry an `href`, so use [`Tag::open_anchor`] for them; this
    /// returns `<a>` which Telegram accepts but renders as plain text.
    pub fn open(self) -> String {
        format!("<{}>", self.name())
    }

    /// Opening markup for an anchor. `escaped_href` must already be escaped
    /// for a double-quoted attribute.
    pub fn open_anchor(escaped_href: &str) -> String {
        format!("<a href=\"{escaped_href}\">")
    }

    pub fn close(self) -> String {
        format!("</{}>", self.name())
    }

    /// Looks a tag up by its element name.
    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.name() == name)
    }
}
