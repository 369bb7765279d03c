//! Length-prefixed framing
//!
//! ```text
//! record  := length:u32-le ++ payload[length]
//! stream  := record*
//! ```
//!
//! There is no header, footer or record count. A stream ends cleanly when
//! end-of-file falls exactly on a record boundary.

use crate::error::{MalformedReason, WireError};
use std::io::{self, BufReader, BufWriter, Read, Write};

/// Size of the length prefix in bytes
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// Default upper bound on a single payload accepted by readers
pub const DEFAULT_MAX_RECORD_LEN: u32 = 16 * 1024 * 1024;

/// Upper bound on the initial payload allocation, whatever the prefix claims
pub(crate) const PREALLOCATION_LIMIT: usize = 64 * 1024;

/// One payload read from a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Zero-based position in the stream
    pub index: usize,
    /// Raw payload bytes
    pub payload: Vec<u8>,
}

/// Narrow a payload length to the prefix type
///
/// Writers accept any length the prefix can carry; `max_record_len` only
/// bounds what readers will allocate.
pub(crate) fn encode_len(index: usize, len: usize) -> Result<[u8; 4], WireError> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| WireError::PayloadTooLarge {
            index,
            len: len as u64,
        })
}

/// Validate a decoded prefix against the reader's limit
pub(crate) fn decode_len(index: usize, prefix: [u8; 4], max: u32) -> Result<u32, WireError> {
    let len = u32::from_le_bytes(prefix);
    if len > max {
        return Err(WireError::malformed(
            index,
            MalformedReason::Oversized {
                len: u64::from(len),
                max,
            },
        ));
    }
    Ok(len)
}

/// Buffered frame writer
///
/// Prefix and payload of a frame go through the same buffer back to back,
/// so each record reaches the underlying writer as a unit.
#[derive(Debug)]
pub struct FrameWriter<W: Write> {
    inner: BufWriter<W>,
    frames: usize,
    bytes: u64,
}

impl<W: Write> FrameWriter<W> {
    /// Wrap `writer` with a buffer of `capacity` bytes
    pub fn with_capacity(capacity: usize, writer: W) -> Self {
        Self {
            inner: BufWriter::with_capacity(capacity, writer),
            frames: 0,
            bytes: 0,
        }
    }

    /// Append one frame
    ///
    /// # Errors
    /// [`WireError::PayloadTooLarge`] if the length does not fit the prefix,
    /// or [`WireError::Io`] if the writer fails.
    pub fn write_frame(&mut self, payload: &[u8]) -> Result<(), WireError> {
        let prefix = encode_len(self.frames, payload.len())?;
        self.inner.write_all(&prefix)?;
        self.inner.write_all(payload)?;
        self.frames += 1;
        self.bytes += (LENGTH_PREFIX_BYTES + payload.len()) as u64;
        Ok(())
    }

    /// Frames written so far
    #[inline]
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Bytes written so far, prefixes included
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Flush the buffer and hand back the writer
    ///
    /// # Errors
    /// [`WireError::Io`] if the final flush fails.
    pub fn finish(self) -> Result<W, WireError> {
        self.inner
            .into_inner()
            .map_err(|e| WireError::Io(e.into_error()))
    }
}

/// Buffered frame reader
#[derive(Debug)]
pub struct FrameReader<R: Read> {
    inner: BufReader<R>,
    max_len: u32,
    index: usize,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    /// Wrap `reader` with a buffer of `capacity` bytes
    pub fn with_capacity(capacity: usize, max_len: u32, reader: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, reader),
            max_len,
            index: 0,
            done: false,
        }
    }

    /// Read the next frame, or `None` at a clean end of stream
    ///
    /// # Errors
    /// [`WireError::MalformedRecord`] for a truncated or oversized frame,
    /// [`WireError::Io`] if the reader fails.
    pub fn read_frame(&mut self) -> Result<Option<Frame>, WireError> {
        if self.done {
            return Ok(None);
        }
        let result = self.read_next();
        if !matches!(result, Ok(Some(_))) {
            self.done = true;
        }
        result
    }

    fn read_next(&mut self) -> Result<Option<Frame>, WireError> {
        let index = self.index;
        let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
        let read = read_full(&mut self.inner, &mut prefix)?;
        if read == 0 {
            return Ok(None);
        }
        if read < LENGTH_PREFIX_BYTES {
            return Err(WireError::malformed(
                index,
                MalformedReason::TruncatedPrefix { read },
            ));
        }

        let len = decode_len(index, prefix, self.max_len)?;
        let mut payload = Vec::with_capacity((len as usize).min(PREALLOCATION_LIMIT));
        (&mut self.inner)
            .take(u64::from(len))
            .read_to_end(&mut payload)?;
        if payload.len() < len as usize {
            return Err(WireError::malformed(
                index,
                MalformedReason::TruncatedPayload {
                    expected: len,
                    found: payload.len(),
                },
            ));
        }

        self.index += 1;
        Ok(Some(Frame { index, payload }))
    }

    /// Frames read so far
    #[inline]
    #[must_use]
    pub fn frames(&self) -> usize {
        self.index
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Frame, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}

/// Fill `buf` as far as the stream allows, returning the byte count
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn framed(payloads: &[&[u8]]) -> Vec<u8> {
        let mut writer = FrameWriter::with_capacity(16, Vec::new());
        for p in payloads {
            writer.write_frame(p).unwrap();
        }
        writer.finish().unwrap()
    }

    fn reader(bytes: &[u8]) -> FrameReader<&[u8]> {
        FrameReader::with_capacity(16, DEFAULT_MAX_RECORD_LEN, bytes)
    }

    #[test]
    fn prefix_is_little_endian_length() {
        let bytes = framed(&[b"abc"]);
        assert_eq!(bytes, vec![3, 0, 0, 0, b'a', b'b', b'c']);
    }

    #[test]
    fn frames_come_back_in_order() {
        let bytes = framed(&[b"one", b"", b"three"]);
        let frames: Vec<_> = reader(&bytes).map(Result::unwrap).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].index, 1);
        assert!(frames[1].payload.is_empty());
        assert_eq!(frames[2].payload, b"three");
    }

    #[test]
    fn empty_stream_has_no_frames() {
        assert!(reader(&[]).read_frame().unwrap().is_none());
    }

    #[test]
    fn truncated_prefix_is_malformed() {
        let mut bytes = framed(&[b"ok"]);
        bytes.extend_from_slice(&[1, 0]);
        let mut r = reader(&bytes);
        assert!(r.read_frame().unwrap().is_some());
        let err = r.read_frame().unwrap_err();
        assert!(matches!(
            err,
            WireError::MalformedRecord {
                index: 1,
                reason: MalformedReason::TruncatedPrefix { read: 2 }
            }
        ));
        assert!(r.read_frame().unwrap().is_none());
    }

    #[test]
    fn prefix_longer_than_stream_is_malformed() {
        let bytes = [10u8, 0, 0, 0, 1, 2, 3];
        let err = reader(&bytes).read_frame().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(matches!(
            err,
            WireError::MalformedRecord {
                reason: MalformedReason::TruncatedPayload {
                    expected: 10,
                    found: 3
                },
                ..
            }
        ));
    }

    #[test]
    fn reader_accepts_length_equal_to_limit() {
        let bytes = framed(&[b"abc"]);

        let mut r = FrameReader::with_capacity(16, 3, &bytes[..]);
        assert_eq!(r.read_frame().unwrap().unwrap().payload, b"abc");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn length_beyond_prefix_range_is_too_large() {
        let len = u32::MAX as usize + 1;
        let err = encode_len(5, len).unwrap_err();
        assert!(matches!(
            err,
            WireError::PayloadTooLarge { index: 5, len: l } if l == len as u64
        ));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert_eq!(encode_len(0, u32::MAX as usize).unwrap(), [0xff; 4]);
    }

    #[test]
    fn oversized_frames_are_rejected_by_reader() {
        let bytes = framed(&[b"abc"]);
        let mut r = FrameReader::with_capacity(16, 2, &bytes[..]);
        assert!(matches!(
            r.read_frame().unwrap_err(),
            WireError::MalformedRecord {
                reason: MalformedReason::Oversized { len: 3, max: 2 },
                ..
            }
        ));
    }

    #[test]
    fn writer_counts_bytes_and_frames() {
        let mut writer = FrameWriter::with_capacity(16, Vec::new());
        writer.write_frame(b"12345").unwrap();
        writer.write_frame(b"").unwrap();
        assert_eq!(writer.frames(), 2);
        assert_eq!(writer.bytes(), 13);
    }
}
