//! Serializer configuration

use crate::codec::CodecKind;
use crate::frame::DEFAULT_MAX_RECORD_LEN;
use auxlist_graph::{RandomTokens, SequentialTokens, TokenSource};
use serde::{Deserialize, Serialize};

/// How identity tokens are generated while serializing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStrategy {
    /// Random v4 UUIDs
    #[default]
    Random,
    /// Counter starting at 1, reproducible byte-for-byte
    Sequential,
}

impl TokenStrategy {
    /// Fresh token source for one call
    #[must_use]
    pub fn source(self) -> Box<dyn TokenSource + Send> {
        match self {
            Self::Random => Box::new(RandomTokens),
            Self::Sequential => Box::new(SequentialTokens::new()),
        }
    }
}

/// Serializer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Payload codec
    pub codec: CodecKind,
    /// Token generation
    pub tokens: TokenStrategy,
    /// Largest payload a reader accepts, in bytes; writers are bounded only
    /// by the `u32` prefix
    pub max_record_len: u32,
    /// I/O buffer size in bytes
    pub buffer_capacity: usize,
}

impl SerializerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With payload codec
    #[inline]
    #[must_use]
    pub fn with_codec(mut self, codec: CodecKind) -> Self {
        self.codec = codec;
        self
    }

    /// With token strategy
    #[inline]
    #[must_use]
    pub fn with_tokens(mut self, tokens: TokenStrategy) -> Self {
        self.tokens = tokens;
        self
    }

    /// With payload size limit
    #[inline]
    #[must_use]
    pub fn with_max_record_len(mut self, max: u32) -> Self {
        self.max_record_len = max;
        self
    }

    /// With I/O buffer size
    #[inline]
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            codec: CodecKind::Bincode,
            tokens: TokenStrategy::Random,
            max_record_len: DEFAULT_MAX_RECORD_LEN,
            buffer_capacity: 64 * 1024,
        }
    }
}
