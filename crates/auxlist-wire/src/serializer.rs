//! Serializer facade
//!
//! Ties the linearizer and reconstructor to the framed stream format.
//! Records are produced lazily while writing and fed to the reconstructor
//! one at a time while reading, so neither direction holds the whole
//! record sequence in memory.

use crate::codec::RecordCodec;
use crate::config::SerializerConfig;
use crate::error::WireError;
use crate::frame::{FrameReader, FrameWriter};
use auxlist_graph::{GraphError, Linearizer, NodeArena, NodeId, Reconstructor};
use std::io::{Read, Seek, SeekFrom, Write};

/// Serialize, deserialize and deep-copy auxiliary-pointer chains
///
/// # Example
/// ```
/// use auxlist_graph::NodeArena;
/// use auxlist_wire::ListSerializer;
///
/// let (mut arena, head) = NodeArena::from_payloads([Some("a"), Some("b")]);
/// let head = head.unwrap();
/// arena.set_auxiliary(head, Some(head)).unwrap();
///
/// let serializer = ListSerializer::new();
/// let bytes = serializer.to_bytes(&arena, head).unwrap();
///
/// let mut rebuilt = NodeArena::new();
/// let rebuilt_head = serializer.from_bytes(&mut rebuilt, &bytes).unwrap();
/// assert_eq!(rebuilt[rebuilt_head].auxiliary(), Some(rebuilt_head));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSerializer {
    config: SerializerConfig,
}

impl ListSerializer {
    /// Serializer with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer with custom configuration
    #[must_use]
    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Write the chain at `head` to `writer`, returning the record count
    ///
    /// # Errors
    /// - [`WireError::Graph`] if `head` is not in `arena`
    /// - [`WireError::Io`] if the writer does not accept every byte
    /// - [`WireError::PayloadTooLarge`] if a record exceeds the `u32` prefix
    pub fn serialize<W: Write>(
        &self,
        arena: &NodeArena,
        head: NodeId,
        writer: W,
    ) -> Result<usize, WireError> {
        let records = Linearizer::new(arena, head, self.config.tokens.source())?;
        let mut frames = FrameWriter::with_capacity(self.config.buffer_capacity, writer);

        for record in records {
            let payload = self
                .config
                .codec
                .encode(&record)
                .map_err(|source| WireError::Encode {
                    index: frames.frames(),
                    source,
                })?;
            frames.write_frame(&payload)?;
        }

        let (count, bytes) = (frames.frames(), frames.bytes());
        frames.finish()?;
        tracing::debug!(records = count, bytes, codec = %self.config.codec, "chain serialized");
        Ok(count)
    }

    /// Rewind `reader` to its start and rebuild the chain it holds
    ///
    /// # Errors
    /// See [`ListSerializer::deserialize_from`].
    pub fn deserialize<R: Read + Seek>(
        &self,
        arena: &mut NodeArena,
        mut reader: R,
    ) -> Result<NodeId, WireError> {
        reader.seek(SeekFrom::Start(0))?;
        self.deserialize_from(arena, reader)
    }

    /// Rebuild a chain from `reader`'s current position to end of stream
    ///
    /// The new nodes are appended to `arena`. On error `arena` is left
    /// exactly as it was.
    ///
    /// # Errors
    /// - [`WireError::MalformedRecord`] for truncated, oversized or
    ///   undecodable records
    /// - [`WireError::Graph`] for an empty stream, a duplicated id or an
    ///   auxiliary id that no record defines
    /// - [`WireError::Io`] if the reader fails
    pub fn deserialize_from<R: Read>(
        &self,
        arena: &mut NodeArena,
        reader: R,
    ) -> Result<NodeId, WireError> {
        let mut frames = FrameReader::with_capacity(
            self.config.buffer_capacity,
            self.config.max_record_len,
            reader,
        );
        let mut builder = Reconstructor::new(arena);

        let result = self
            .pump(&mut frames, &mut builder)
            .and_then(|()| builder.finish().map_err(WireError::from));
        match result {
            Ok(head) => Ok(head),
            Err(err) => {
                tracing::warn!(error = %err, records = frames.frames(), "stream rejected");
                Err(err)
            }
        }
    }

    fn pump<R: Read>(
        &self,
        frames: &mut FrameReader<R>,
        builder: &mut Reconstructor<'_>,
    ) -> Result<(), WireError> {
        while let Some(frame) = frames.read_frame()? {
            let record = self
                .config
                .codec
                .decode(&frame.payload)
                .map_err(|e| WireError::malformed(frame.index, e))?;
            builder.push(record)?;
        }
        Ok(())
    }

    /// Copy the chain at `head` within `arena` without touching any stream
    ///
    /// # Errors
    /// See [`auxlist_graph::deep_copy`].
    pub fn deep_copy(&self, arena: &mut NodeArena, head: NodeId) -> Result<NodeId, GraphError> {
        auxlist_graph::deep_copy(arena, head)
    }

    /// Serialize into a fresh byte vector
    ///
    /// # Errors
    /// See [`ListSerializer::serialize`].
    pub fn to_bytes(&self, arena: &NodeArena, head: NodeId) -> Result<Vec<u8>, WireError> {
        let mut bytes = Vec::new();
        self.serialize(arena, head, &mut bytes)?;
        Ok(bytes)
    }

    /// Deserialize from a byte slice
    ///
    /// # Errors
    /// See [`ListSerializer::deserialize_from`].
    pub fn from_bytes(&self, arena: &mut NodeArena, bytes: &[u8]) -> Result<NodeId, WireError> {
        self.deserialize_from(arena, bytes)
    }
}
