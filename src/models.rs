//! Core data structures for aggregation results.
//!
//! Defines the merged per-station rows handed to the formatter and the run
//! statistics reported by the CLI.

use crate::engine::accumulator::Accumulator;
use serde::Serialize;
use std::time::Duration;

/// Merged statistics for one station, ready for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSummary {
    /// Raw station name bytes; these define the output order
    pub key: Vec<u8>,
    /// Station name for display
    pub name: String,
    pub stats: Accumulator,
}

impl StationSummary {
    pub fn new(key: &[u8], stats: Accumulator) -> Self {
        Self {
            key: key.to_vec(),
            name: String::from_utf8_lossy(key).into_owned(),
            stats,
        }
    }

    pub fn min_tenths(&self) -> i64 {
        self.stats.min as i64
    }

    pub fn max_tenths(&self) -> i64 {
        self.stats.max as i64
    }

    /// Mean rounded half-up to tenths
    pub fn mean_tenths(&self) -> i64 {
        self.stats.mean_tenths()
    }

    pub fn count(&self) -> u64 {
        self.stats.count
    }
}

/// Statistics describing one aggregation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Bytes of input consumed
    pub input_bytes: u64,
    /// Chunks dispatched to workers
    pub chunks: usize,
    /// Worker threads used
    pub workers: usize,
    /// Records aggregated
    pub records: u64,
    /// Lines skipped because they carried no delimiter
    pub skipped_lines: u64,
    /// Distinct stations observed
    pub stations: usize,
    /// Wall-clock time spent aggregating
    pub elapsed: Duration,
}

impl RunStats {
    /// Throughput in megabytes per second
    pub fn throughput_mb_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / (1024.0 * 1024.0) / secs
        }
    }

    /// Get summary of the run for logging
    pub fn summary(&self) -> String {
        format!(
            "{} records from {} stations in {:.2?} ({} chunks, {} workers, {:.1} MB/s, {} skipped lines)",
            self.records,
            self.stations,
            self.elapsed,
            self.chunks,
            self.workers,
            self.throughput_mb_per_sec(),
            self.skipped_lines
        )
    }
}

/// Output of an aggregation run: sorted station rows plus run statistics
#[derive(Debug, Clone)]
pub struct AggregationResult {
    pub stations: Vec<StationSummary>,
    pub stats: RunStats,
}
