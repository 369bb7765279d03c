//! Async stream wrappers
//!
//! Same framing and ordering as the blocking API; records are still
//! processed one at a time, so dropping a future between awaits never
//! leaves a half-populated node. A dropped deserialization rolls the
//! arena back exactly like a failed one.

use crate::codec::RecordCodec;
use crate::error::{MalformedReason, WireError};
use crate::frame::{decode_len, encode_len, Frame, LENGTH_PREFIX_BYTES, PREALLOCATION_LIMIT};
use crate::serializer::ListSerializer;
use auxlist_graph::{Linearizer, NodeArena, NodeId, Reconstructor};
use std::io::SeekFrom;
use tokio::io::{
    AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt, BufReader,
    BufWriter,
};

impl ListSerializer {
    /// Async counterpart of [`ListSerializer::serialize`]
    ///
    /// # Errors
    /// See [`ListSerializer::serialize`].
    pub async fn serialize_async<W: AsyncWrite + Unpin>(
        &self,
        arena: &NodeArena,
        head: NodeId,
        writer: W,
    ) -> Result<usize, WireError> {
        let config = self.config();
        let records = Linearizer::new(arena, head, config.tokens.source())?;
        let mut out = BufWriter::with_capacity(config.buffer_capacity, writer);
        let mut count = 0usize;

        for record in records {
            let payload = config
                .codec
                .encode(&record)
                .map_err(|source| WireError::Encode {
                    index: count,
                    source,
                })?;
            let prefix = encode_len(count, payload.len())?;
            out.write_all(&prefix).await?;
            out.write_all(&payload).await?;
            count += 1;
        }

        out.flush().await?;
        tracing::debug!(records = count, codec = %config.codec, "chain serialized");
        Ok(count)
    }

    /// Async counterpart of [`ListSerializer::deserialize`]
    ///
    /// # Errors
    /// See [`ListSerializer::deserialize_from`].
    pub async fn deserialize_async<R: AsyncRead + AsyncSeek + Unpin>(
        &self,
        arena: &mut NodeArena,
        mut reader: R,
    ) -> Result<NodeId, WireError> {
        reader.seek(SeekFrom::Start(0)).await?;
        self.deserialize_from_async(arena, reader).await
    }

    /// Async counterpart of [`ListSerializer::deserialize_from`]
    ///
    /// # Errors
    /// See [`ListSerializer::deserialize_from`].
    pub async fn deserialize_from_async<R: AsyncRead + Unpin>(
        &self,
        arena: &mut NodeArena,
        reader: R,
    ) -> Result<NodeId, WireError> {
        let config = self.config();
        let mut input = BufReader::with_capacity(config.buffer_capacity, reader);
        let mut builder = Reconstructor::new(arena);
        let mut records = 0usize;

        let pumped = self.pump_async(&mut input, &mut builder, &mut records).await;
        let result = pumped.and_then(|()| builder.finish().map_err(WireError::from));
        if let Err(err) = &result {
            tracing::warn!(error = %err, records, "stream rejected");
        }
        result
    }

    async fn pump_async<R: AsyncRead + Unpin>(
        &self,
        input: &mut R,
        builder: &mut Reconstructor<'_>,
        records: &mut usize,
    ) -> Result<(), WireError> {
        let config = self.config();
        while let Some(frame) = read_frame(input, *records, config.max_record_len).await? {
            let record = config
                .codec
                .decode(&frame.payload)
                .map_err(|e| WireError::malformed(frame.index, e))?;
            builder.push(record)?;
            *records += 1;
        }
        Ok(())
    }
}

async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
    index: usize,
    max_len: u32,
) -> Result<Option<Frame>, WireError> {
    let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
    let mut read = 0;
    while read < LENGTH_PREFIX_BYTES {
        match reader.read(&mut prefix[read..]).await? {
            0 => break,
            n => read += n,
        }
    }
    if read == 0 {
        return Ok(None);
    }
    if read < LENGTH_PREFIX_BYTES {
        return Err(WireError::malformed(
            index,
            MalformedReason::TruncatedPrefix { read },
        ));
    }

    let len = decode_len(index, prefix, max_len)?;
    let mut payload = Vec::with_capacity((len as usize).min(PREALLOCATION_LIMIT));
    reader
        .take(u64::from(len))
        .read_to_end(&mut payload)
        .await?;
    if payload.len() < len as usize {
        return Err(WireError::malformed(
            index,
            MalformedReason::TruncatedPayload {
                expected: len,
                found: payload.len(),
            },
        ));
    }
    Ok(Some(Frame { index, payload }))
}
