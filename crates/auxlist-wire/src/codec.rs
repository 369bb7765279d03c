//! Payload codecs
//!
//! A codec turns one [`WireRecord`] into the payload of one frame and back.
//! Both codecs keep the absent/present distinction of `auxiliary_id` and
//! `data` exactly.

use crate::error::CodecError;
use auxlist_graph::WireRecord;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Record payload encoding
pub trait RecordCodec {
    /// Encode one record
    ///
    /// # Errors
    /// Returns [`CodecError`] if the record cannot be represented.
    fn encode(&self, record: &WireRecord) -> Result<Vec<u8>, CodecError>;

    /// Decode one record from a complete payload
    ///
    /// # Errors
    /// Returns [`CodecError`] on invalid or trailing bytes.
    fn decode(&self, bytes: &[u8]) -> Result<WireRecord, CodecError>;
}

/// Compact binary payloads (varint lengths, raw 16-byte tokens)
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    fn options() -> impl Options {
        bincode::DefaultOptions::new().reject_trailing_bytes()
    }
}

impl RecordCodec for BincodeCodec {
    fn encode(&self, record: &WireRecord) -> Result<Vec<u8>, CodecError> {
        Ok(Self::options().serialize(record)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<WireRecord, CodecError> {
        Ok(Self::options().deserialize(bytes)?)
    }
}

/// Human-readable JSON payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl RecordCodec for JsonCodec {
    fn encode(&self, record: &WireRecord) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(record)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<WireRecord, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Selectable codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// [`BincodeCodec`]
    #[default]
    Bincode,
    /// [`JsonCodec`]
    Json,
}

impl CodecKind {
    /// All selectable codecs
    pub const ALL: [CodecKind; 2] = [CodecKind::Bincode, CodecKind::Json];

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bincode => "bincode",
            Self::Json => "json",
        }
    }
}

impl RecordCodec for CodecKind {
    fn encode(&self, record: &WireRecord) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Bincode => BincodeCodec.encode(record),
            Self::Json => JsonCodec.encode(record),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<WireRecord, CodecError> {
        match self {
            Self::Bincode => BincodeCodec.decode(bytes),
            Self::Json => JsonCodec.decode(bytes),
        }
    }
}

impl Display for CodecKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown codec name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown codec `{0}` (expected bincode or json)")]
pub struct UnknownCodec(pub String);

impl FromStr for CodecKind {
    type Err = UnknownCodec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCodec(s.to_string()))
    }
}
