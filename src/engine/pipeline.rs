//! Parallel aggregation pipeline
//!
//! Orchestrates a complete run: chunking, one scoped worker thread per
//! partition table, the join barrier, freezing the key registry, merging and
//! sorting. The key registry is the only structure shared between workers.

use super::chunker::split_chunks;
use super::merger::merge_tables;
use super::registry::KeyRegistry;
use super::streaming::{Block, BlockReader};
use super::table::PartitionTable;
use super::worker::{WorkerStats, process_chunk};
use crate::config::AggregatorConfig;
use crate::error::{AggregatorError, Result};
use crate::models::{AggregationResult, RunStats};
use crate::source::ByteSource;

use std::io::Read;
use std::ops::Range;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// Main entry point for aggregating station measurements
#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    /// Create an aggregator, rejecting invalid configuration
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate an in-memory or memory-mapped input
    pub fn aggregate<S: ByteSource + ?Sized>(&self, source: &S) -> Result<AggregationResult> {
        let start_time = Instant::now();
        let data = source.as_bytes();

        let chunk_size = self.config.effective_chunk_size(data.len());
        let chunks = split_chunks(data, chunk_size)?;
        let workers = self.config.workers.min(chunks.len()).max(1);

        info!(
            "Aggregating {} bytes in {} chunks with {} workers",
            data.len(),
            chunks.len(),
            workers
        );

        let registry = KeyRegistry::new();
        let mut tables = self.new_tables(workers);
        let totals = scan_parallel(data, &chunks, &mut tables, &registry)?;

        self.finish(registry, tables, totals, chunks.len(), workers, start_time)
    }

    /// Aggregate from a reader, one newline-aligned block per worker at a time
    ///
    /// Each worker keeps its table across batches, so memory stays bounded
    /// by the block size and the table capacity rather than the input size.
    pub fn aggregate_reader<R: Read>(&self, reader: R) -> Result<AggregationResult> {
        let start_time = Instant::now();
        let workers = self.config.workers;
        let mut blocks = BlockReader::new(reader, self.config.read_block_size);

        let registry = KeyRegistry::new();
        let mut tables = self.new_tables(workers);
        let mut totals = WorkerStats::default();
        let mut block_count = 0;

        loop {
            let mut batch = Vec::with_capacity(workers);
            while batch.len() < workers {
                match blocks.next_block()? {
                    Some(block) => batch.push(block),
                    None => break,
                }
            }
            if batch.is_empty() {
                break;
            }

            block_count += batch.len();
            debug!("Dispatching batch of {} blocks", batch.len());
            totals.absorb(scan_blocks(&batch, &mut tables, &registry)?);
        }

        info!(
            "Streamed {} bytes in {} blocks with {} workers",
            totals.bytes, block_count, workers
        );

        self.finish(registry, tables, totals, block_count, workers, start_time)
    }

    fn new_tables(&self, workers: usize) -> Vec<PartitionTable> {
        (0..workers)
            .map(|_| PartitionTable::with_capacity(self.config.table_capacity))
            .collect()
    }

    /// Merge the tables after the join barrier and assemble the result
    fn finish(
        &self,
        registry: KeyRegistry,
        tables: Vec<PartitionTable>,
        totals: WorkerStats,
        chunks: usize,
        workers: usize,
        start_time: Instant,
    ) -> Result<AggregationResult> {
        let keys = registry.into_sorted();
        let stations = merge_tables(&keys, &tables)?;

        let stats = RunStats {
            input_bytes: totals.bytes,
            chunks,
            workers,
            records: totals.records,
            skipped_lines: totals.skipped_lines,
            stations: stations.len(),
            elapsed: start_time.elapsed(),
        };

        info!("Aggregation complete: {}", stats.summary());
        Ok(AggregationResult { stations, stats })
    }
}

/// Scan `chunks` with one thread per table; worker `i` takes chunks `i`, `i + n`, ...
fn scan_parallel(
    data: &[u8],
    chunks: &[Range<usize>],
    tables: &mut [PartitionTable],
    registry: &KeyRegistry,
) -> Result<WorkerStats> {
    let workers = tables.len();

    thread::scope(|scope| {
        let handles: Vec<_> = tables
            .iter_mut()
            .enumerate()
            .map(|(worker, table)| {
                scope.spawn(move || {
                    let mut stats = WorkerStats::default();
                    for range in chunks.iter().skip(worker).step_by(workers) {
                        stats.absorb(process_chunk(data, range.clone(), table, registry)?);
                    }
                    Ok::<_, AggregatorError>(stats)
                })
            })
            .collect();

        join_workers(handles)
    })
}

/// Scan one block per table in parallel
fn scan_blocks(
    batch: &[Block],
    tables: &mut [PartitionTable],
    registry: &KeyRegistry,
) -> Result<WorkerStats> {
    thread::scope(|scope| {
        let handles: Vec<_> = batch
            .iter()
            .zip(tables.iter_mut())
            .map(|(block, table)| {
                scope.spawn(move || {
                    process_chunk(&block.bytes, 0..block.bytes.len(), table, registry)
                        .map_err(|e| e.with_base_offset(block.offset))
                })
            })
            .collect();

        join_workers(handles)
    })
}

fn join_workers(
    handles: Vec<thread::ScopedJoinHandle<'_, Result<WorkerStats>>>,
) -> Result<WorkerStats> {
    let mut totals = WorkerStats::default();
    for (worker, handle) in handles.into_iter().enumerate() {
        let stats = handle
            .join()
            .map_err(|_| AggregatorError::WorkerPanicked { worker })??;
        totals.absorb(stats);
    }
    Ok(totals)
}
