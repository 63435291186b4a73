//! Markdown-to-Telegram-HTML conversion and tag-balanced chunking.
//!
//! ```text
//! raw reply ─▶ convert ─▶ marked-up text ─▶ chunk::split ─▶ chunks ─▶ Delivery
//! ```
//!
//! Both stages are pure functions over strings with no shared state.

pub mod chunk;
pub mod convert;
pub mod delivery;
pub mod escape;
pub mod metric;

pub use chunk::{ChunkError, split, split_with};
pub use convert::convert;
pub use delivery::{
    Delivery, DeliveryError, MarkupMode, TransportError, deliver_chunks, deliver_reply,
};
pub use metric::{ChunkLimit, LengthMetric, TELEGRAM_MAX_LENGTH};

/// Converts `raw` and splits the result under `limit`.
pub fn render(raw: &str, limit: ChunkLimit) -> Result<Vec<String>, ChunkError> {
    split_with(&convert(raw), limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_reply_is_one_chunk() {
        let limit = ChunkLimit::new(TELEGRAM_MAX_LENGTH).unwrap();
        assert_eq!(render("**hi** <there>", limit).unwrap(), vec!["<b>hi</b> &lt;there&gt;"]);
    }
}
