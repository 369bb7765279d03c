//! Subcommand implementations

use crate::generate::random_chain;
use anyhow::{Context, Result};
use auxlist_graph::{structurally_equivalent, NodeArena};
use auxlist_wire::{FrameReader, ListSerializer, RecordCodec, SerializerConfig};
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

/// Timings of one benchmark run
#[derive(Debug, Clone, Serialize)]
pub(crate) struct BenchReport {
    pub(crate) nodes: usize,
    pub(crate) codec: String,
    pub(crate) bytes: usize,
    pub(crate) deep_copy_ms: u128,
    pub(crate) serialize_ms: u128,
    pub(crate) deserialize_ms: u128,
    pub(crate) copy_equivalent: bool,
    pub(crate) round_trip_equivalent: bool,
}

impl BenchReport {
    pub(crate) fn passed(&self) -> bool {
        self.copy_equivalent && self.round_trip_equivalent
    }

    pub(crate) fn generate_text(&self) -> String {
        format!(
            "Elements count: {}\nCodec: {}\nStream size: {} bytes\n\
             DeepCopy: {} ms\nSerialize: {} ms\nDeserialize: {} ms\n\
             Copy equivalent: {}\nRound trip equivalent: {}",
            self.nodes,
            self.codec,
            self.bytes,
            self.deep_copy_ms,
            self.serialize_ms,
            self.deserialize_ms,
            self.copy_equivalent,
            self.round_trip_equivalent,
        )
    }
}

/// Time deep copy, serialization and deserialization of a random chain
pub(crate) fn bench(count: usize, seed: u64, config: SerializerConfig) -> Result<BenchReport> {
    tracing::info!(count, seed, codec = %config.codec, "building random chain");
    let (mut arena, head) = random_chain(count, seed)?;
    let serializer = ListSerializer::with_config(config);

    let started = Instant::now();
    let copy_head = serializer.deep_copy(&mut arena, head)?;
    let deep_copy_ms = started.elapsed().as_millis();
    let copy_equivalent = structurally_equivalent(&arena, head, &arena, copy_head).is_ok();

    let started = Instant::now();
    let mut stream = Cursor::new(Vec::new());
    serializer.serialize(&arena, head, &mut stream)?;
    let serialize_ms = started.elapsed().as_millis();
    let bytes = stream.get_ref().len();

    let started = Instant::now();
    let mut rebuilt = NodeArena::with_capacity(count);
    let rebuilt_head = serializer.deserialize(&mut rebuilt, &mut stream)?;
    let deserialize_ms = started.elapsed().as_millis();
    let round_trip_equivalent =
        structurally_equivalent(&arena, head, &rebuilt, rebuilt_head).is_ok();

    Ok(BenchReport {
        nodes: count,
        codec: config.codec.to_string(),
        bytes,
        deep_copy_ms,
        serialize_ms,
        deserialize_ms,
        copy_equivalent,
        round_trip_equivalent,
    })
}

/// Write a random chain to `output`, returning the record count
pub(crate) async fn encode(
    count: usize,
    seed: u64,
    config: SerializerConfig,
    output: &Path,
) -> Result<usize> {
    let (arena, head) = random_chain(count, seed)?;
    let file = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("creating {}", output.display()))?;
    let records = ListSerializer::with_config(config)
        .serialize_async(&arena, head, file)
        .await?;
    tracing::info!(records, path = %output.display(), "stream written");
    Ok(records)
}

/// Summary of a stream on disk
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct InspectReport {
    pub(crate) bytes: usize,
    pub(crate) records: usize,
    pub(crate) self_references: usize,
    pub(crate) absent_auxiliaries: usize,
    pub(crate) absent_payloads: usize,
    pub(crate) valid: bool,
    pub(crate) error: Option<String>,
}

impl InspectReport {
    pub(crate) fn generate_text(&self) -> String {
        let mut text = format!(
            "Stream size: {} bytes\nRecords: {}\nSelf references: {}\n\
             Absent auxiliaries: {}\nAbsent payloads: {}\nStatus: {}",
            self.bytes,
            self.records,
            self.self_references,
            self.absent_auxiliaries,
            self.absent_payloads,
            if self.valid { "VALID" } else { "INVALID" },
        );
        if let Some(error) = &self.error {
            text.push_str(&format!("\nError: {error}"));
        }
        text
    }
}

/// Decode and reconstruct the stream at `input`
pub(crate) async fn inspect(config: SerializerConfig, input: &Path) -> Result<InspectReport> {
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;
    let mut report = InspectReport {
        bytes: bytes.len(),
        ..InspectReport::default()
    };

    let frames =
        FrameReader::with_capacity(config.buffer_capacity, config.max_record_len, &bytes[..]);
    for frame in frames {
        let record = match frame.and_then(|f| {
            config
                .codec
                .decode(&f.payload)
                .map_err(|e| auxlist_wire::WireError::malformed(f.index, e))
        }) {
            Ok(record) => record,
            Err(err) => {
                report.error = Some(err.to_string());
                return Ok(report);
            }
        };
        report.records += 1;
        report.self_references += usize::from(record.is_self_referential());
        report.absent_auxiliaries += usize::from(record.auxiliary_id.is_none());
        report.absent_payloads += usize::from(record.data.is_none());
    }

    let mut arena = NodeArena::with_capacity(report.records);
    match ListSerializer::with_config(config).from_bytes(&mut arena, &bytes) {
        Ok(_) => report.valid = true,
        Err(err) => report.error = Some(err.to_string()),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxlist_wire::CodecKind;

    #[test]
    fn bench_reports_equivalence() {
        let report = bench(500, 42, SerializerConfig::new()).unwrap();
        assert!(report.passed());
        assert_eq!(report.nodes, 500);
        assert!(report.bytes > 0);
    }

    #[test]
    fn bench_rejects_empty_chain() {
        assert!(bench(0, 1, SerializerConfig::new()).is_err());
    }

    #[tokio::test]
    async fn encode_then_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.bin");
        let config = SerializerConfig::new().with_codec(CodecKind::Json);

        let written = encode(64, 3, config, &path).await.unwrap();
        let report = inspect(config, &path).await.unwrap();
        assert_eq!(report.records, written);
        assert!(report.valid, "{:?}", report.error);
        assert_eq!(report.absent_auxiliaries, 0);
    }

    #[tokio::test]
    async fn inspect_flags_truncated_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.bin");
        let config = SerializerConfig::new();
        encode(16, 9, config, &path).await.unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        bytes.truncate(bytes.len() - 2);
        std::fs::write(&path, &bytes).unwrap();

        let report = inspect(config, &path).await.unwrap();
        assert!(!report.valid);
        assert!(report.error.is_some());
    }
}
