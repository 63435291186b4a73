//! Handing chunks to the transport, strictly in order.

use serde::{Deserialize, Serialize};

use crate::{
    chunk::{self, ChunkError},
    convert::convert,
    metric::ChunkLimit,
};

/// How the transport should interpret a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupMode {
    #[default]
    Html,
}

impl MarkupMode {
    /// The `parse_mode` value Telegram expects.
    pub fn parse_mode(self) -> &'static str {
        match self {
            MarkupMode::Html => "HTML",
        }
    }
}

pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// The messaging transport. One call per chunk.
pub trait Delivery {
    fn deliver(
        &mut self,
        recipient: &str,
        chunk: &str,
        mode: MarkupMode,
    ) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error("delivering chunk {} of {total} failed", .index + 1)]
    Transport {
        index: usize,
        total: usize,
        #[source]
        source: TransportError,
    },
}

/// Converts `raw`, splits it under `limit` and delivers every chunk in
/// order.
///
/// Returns the number of chunks delivered.
pub fn deliver_reply<D: Delivery + ?Sized>(
    delivery: &mut D,
    recipient: &str,
    raw: &str,
    limit: ChunkLimit,
    mode: MarkupMode,
) -> Result<usize, DeliveryError> {
    let chunks = chunk::split_with(&convert(raw), limit)?;
    deliver_chunks(delivery, recipient, &chunks, mode)
}

/// Delivers already split chunks in order. Stops at the first chunk the
/// transport rejects, so a recipient never sees a later part without the
/// earlier ones.
pub fn deliver_chunks<D: Delivery + ?Sized>(
    delivery: &mut D,
    recipient: &str,
    chunks: &[String],
    mode: MarkupMode,
) -> Result<usize, DeliveryError> {
    let total = chunks.len();
    for (index, chunk) in chunks.iter().enumerate() {
        log::debug!("delivering chunk {}/{total} to {recipient}", index + 1);
        delivery
            .deliver(recipient, chunk, mode)
            .map_err(|source| DeliveryError::Transport {
                index,
                total,
                source,
            })?;
    }
    Ok(total)
}
