//! auxlist stream format
//!
//! Serializes auxiliary-pointer chains to a flat byte stream and rebuilds
//! them, preserving every aliasing relationship.
//!
//! # Format
//!
//! A stream is a bare sequence of records, each a little-endian `u32`
//! payload length followed by the payload. The payload is one
//! [`auxlist_graph::WireRecord`] encoded by the configured
//! [`CodecKind`]. There is no header and no record count; readers consume
//! until end of stream.
//!
//! # Example
//!
//! ```
//! use auxlist_graph::NodeArena;
//! use auxlist_wire::{CodecKind, ListSerializer, SerializerConfig};
//! use std::io::Cursor;
//!
//! let (arena, head) = NodeArena::from_payloads([Some("x"), Some("y")]);
//! let head = head.unwrap();
//!
//! let serializer = ListSerializer::with_config(
//!     SerializerConfig::new().with_codec(CodecKind::Json),
//! );
//! let mut stream = Cursor::new(Vec::new());
//! serializer.serialize(&arena, head, &mut stream).unwrap();
//!
//! let mut rebuilt = NodeArena::new();
//! let rebuilt_head = serializer.deserialize(&mut rebuilt, &mut stream).unwrap();
//! assert_eq!(rebuilt.chain_len(rebuilt_head).unwrap(), 2);
//! ```

mod async_io;
mod codec;
mod config;
mod error;
mod frame;
mod serializer;

pub use codec::{BincodeCodec, CodecKind, JsonCodec, RecordCodec, UnknownCodec};
pub use config::{SerializerConfig, TokenStrategy};
pub use error::{CodecError, ErrorKind, MalformedReason, WireError};
pub use frame::{Frame, FrameReader, FrameWriter, DEFAULT_MAX_RECORD_LEN, LENGTH_PREFIX_BYTES};
pub use serializer::ListSerializer;
