//! How chunk length is counted, and the validated limit the chunker obeys.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk::ChunkError;

/// Telegram's per-message limit.
pub const TELEGRAM_MAX_LENGTH: usize = 4096;

/// The unit a chunk's length is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMetric {
    /// Unicode scalar values.
    #[default]
    Chars,
    /// UTF-16 code units, which is how Telegram counts.
    Utf16,
    /// UTF-8 bytes.
    Bytes,
}

impl LengthMetric {
    pub fn measure(self, s: &str) -> usize {
        match self {
            LengthMetric::Chars => s.chars().count(),
            LengthMetric::Utf16 => s.encode_utf16().count(),
            LengthMetric::Bytes => s.len(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthMetric::Chars => "chars",
            LengthMetric::Utf16 => "utf16",
            LengthMetric::Bytes => "bytes",
        }
    }
}

impl fmt::Display for LengthMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown length metric `{0}` (expected chars, utf16 or bytes)")]
pub struct ParseMetricError(String);

impl FromStr for LengthMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chars" => Ok(LengthMetric::Chars),
            "utf16" => Ok(LengthMetric::Utf16),
            "bytes" => Ok(LengthMetric::Bytes),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

/// A positive maximum chunk length and the metric it is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLimit {
    max_length: usize,
    metric: LengthMetric,
}

impl ChunkLimit {
    /// Rejects a zero limit, which would never let the chunker progress.
    pub fn new(max_length: usize) -> Result<Self, ChunkError> {
        if max_length == 0 {
            return Err(ChunkError::ZeroLimit);
        }
        Ok(Self {
            max_length,
            metric: LengthMetric::default(),
        })
    }

    pub fn telegram() -> Self {
        Self {
            max_length: TELEGRAM_MAX_LENGTH,
            metric: LengthMetric::Utf16,
        }
    }

    pub fn with_metric(mut self, metric: LengthMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn metric(&self) -> LengthMetric {
        self.metric
    }

    pub fn measure(&self, s: &str) -> usize {
        self.metric.measure(s)
    }
}
