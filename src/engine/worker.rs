//! Record scanning for one chunk
//!
//! A worker walks its chunk record by record: it hashes the station name while
//! looking for `;`, parses the measurement up to the newline and folds it into
//! its own partition table. Lines without a delimiter (blank lines, a trailing
//! fragment) are skipped.

use super::decimal::parse_tenths;
use super::hasher::{KeyScan, scan_key};
use super::registry::KeyRegistry;
use super::table::PartitionTable;
use crate::constants::{CARRIAGE_RETURN, NEWLINE};
use crate::error::{AggregatorError, Result};
use std::ops::Range;
use tracing::{debug, trace};

/// Counters reported by a worker after scanning a chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Records folded into the table
    pub records: u64,
    /// Lines skipped because they carried no delimiter
    pub skipped_lines: u64,
    /// Bytes scanned
    pub bytes: u64,
}

impl WorkerStats {
    /// Combine counters from another chunk
    pub fn absorb(&mut self, other: WorkerStats) {
        self.records += other.records;
        self.skipped_lines += other.skipped_lines;
        self.bytes += other.bytes;
    }
}

/// Scan `data[range]` into `table`, registering new stations in `registry`.
///
/// Byte offsets in parse errors are relative to the start of `data`.
pub fn process_chunk(
    data: &[u8],
    range: Range<usize>,
    table: &mut PartitionTable,
    registry: &KeyRegistry,
) -> Result<WorkerStats> {
    let chunk_start = range.start;
    let chunk = &data[range];
    let mut stats = WorkerStats {
        bytes: chunk.len() as u64,
        ..WorkerStats::default()
    };
    let mut pos = 0;

    while pos < chunk.len() {
        let (key_len, hash) = match scan_key(&chunk[pos..]) {
            KeyScan::Delimited { len, hash } => (len, hash),
            KeyScan::Undelimited { len } => {
                if len > 0 {
                    trace!("Skipping line without delimiter at offset {}", chunk_start + pos);
                }
                stats.skipped_lines += 1;
                pos += len + 1;
                continue;
            }
        };

        let key = &chunk[pos..pos + key_len];
        let value_start = pos + key_len + 1;
        let line_end = memchr::memchr(NEWLINE, &chunk[value_start..])
            .map(|offset| value_start + offset)
            .unwrap_or(chunk.len());
        let mut value_end = line_end;
        if value_end > value_start && chunk[value_end - 1] == CARRIAGE_RETURN {
            value_end -= 1;
        }
        let raw = &chunk[value_start..value_end];

        let value = parse_tenths(raw)
            .map_err(|_| AggregatorError::parse(chunk_start + value_start, raw))?;

        table.upsert(hash, key, value, registry)?;
        stats.records += 1;
        pos = line_end + 1;
    }

    debug!(
        "Scanned chunk at offset {}: {} records, {} skipped lines, {} stations",
        chunk_start,
        stats.records,
        stats.skipped_lines,
        table.len()
    );

    Ok(stats)
}
