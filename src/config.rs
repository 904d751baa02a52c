//! Configuration management and validation.
//!
//! Provides the aggregation parameters (worker count, chunk sizing, table
//! capacity) and detection of the host's parallelism for defaults.

use crate::constants::{DEFAULT_READ_BLOCK_SIZE, DEFAULT_TABLE_CAPACITY, MIN_CHUNK_SIZE};
use crate::error::{AggregatorError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// System profiling information for sizing the worker pool
#[derive(Debug, Clone)]
pub struct SystemProfile {
    /// Number of logical CPU cores available
    pub cpu_cores: usize,
}

impl SystemProfile {
    /// Auto-detect system capabilities
    pub fn detect() -> Self {
        Self {
            cpu_cores: num_cpus::get(),
        }
    }
}

/// Global configuration for an aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Number of worker threads scanning chunks concurrently
    pub workers: usize,

    /// Target chunk size in bytes - calculated from input length if 0
    pub chunk_size: usize,

    /// Slots per partition table, rounded up to a power of two
    pub table_capacity: usize,

    /// Bytes read per block by the streaming reader
    pub read_block_size: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        let profile = SystemProfile::detect();
        Self {
            workers: profile.cpu_cores.max(1),
            chunk_size: 0, // 0 = input length / workers
            table_capacity: DEFAULT_TABLE_CAPACITY,
            read_block_size: DEFAULT_READ_BLOCK_SIZE,
        }
    }
}

impl AggregatorConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with a fixed chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_table_capacity(mut self, table_capacity: usize) -> Self {
        self.table_capacity = table_capacity;
        self
    }

    pub fn with_read_block_size(mut self, read_block_size: usize) -> Self {
        self.read_block_size = read_block_size;
        self
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(AggregatorError::configuration(
                "worker count must be at least 1",
            ));
        }
        if self.table_capacity == 0 {
            return Err(AggregatorError::configuration(
                "table capacity must be at least 1",
            ));
        }
        if self.table_capacity.checked_next_power_of_two().is_none() {
            return Err(AggregatorError::configuration(format!(
                "table capacity {} cannot be rounded to a power of two",
                self.table_capacity
            )));
        }
        if self.read_block_size == 0 {
            return Err(AggregatorError::configuration(
                "read block size must be at least 1 byte",
            ));
        }
        Ok(())
    }

    /// Chunk size to use for an input of `input_len` bytes
    pub fn effective_chunk_size(&self, input_len: usize) -> usize {
        if self.chunk_size > 0 {
            return self.chunk_size;
        }

        let per_worker = input_len.div_ceil(self.workers.max(1));
        let chunk_size = per_worker.max(MIN_CHUNK_SIZE);

        debug!(
            "Chunk size: {} bytes ({} input bytes, {} workers)",
            chunk_size, input_len, self.workers
        );

        chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AggregatorConfig::default();

        assert!(config.workers >= 1);
        assert_eq!(config.chunk_size, 0);
        assert_eq!(config.table_capacity, DEFAULT_TABLE_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = AggregatorConfig::default()
            .with_workers(6)
            .with_chunk_size(1 << 20)
            .with_table_capacity(4096)
            .with_read_block_size(512);

        assert_eq!(config.workers, 6);
        assert_eq!(config.chunk_size, 1 << 20);
        assert_eq!(config.table_capacity, 4096);
        assert_eq!(config.read_block_size, 512);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(AggregatorConfig::default().with_workers(0).validate().is_err());
        assert!(
            AggregatorConfig::default()
                .with_table_capacity(0)
                .validate()
                .is_err()
        );
        assert!(
            AggregatorConfig::default()
                .with_table_capacity(usize::MAX)
                .validate()
                .is_err()
        );
        assert!(
            AggregatorConfig::default()
                .with_read_block_size(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_effective_chunk_size() {
        // Explicit chunk size wins
        let fixed = AggregatorConfig::default().with_chunk_size(100);
        assert_eq!(fixed.effective_chunk_size(10_000_000), 100);

        // Auto: input split evenly across workers
        let auto = AggregatorConfig::default().with_workers(4);
        assert_eq!(auto.effective_chunk_size(100 * 1024 * 1024), 25 * 1024 * 1024);

        // Small inputs never go below the minimum chunk size
        assert_eq!(auto.effective_chunk_size(1_000), MIN_CHUNK_SIZE);
    }

    #[test]
    fn test_system_profile_detect() {
        let profile = SystemProfile::detect();
        assert!(profile.cpu_cores >= 1);
    }
}
