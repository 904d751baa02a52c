//! Combining per-worker partition tables
//!
//! The merge is driven by the frozen, sorted key registry: for each station
//! the hash is recomputed from the name and looked up in every table. Tables
//! that never saw the station are skipped.

use super::accumulator::Accumulator;
use super::hasher::hash_key;
use super::table::PartitionTable;
use crate::error::{AggregatorError, Result};
use crate::models::StationSummary;

/// Merge `tables` into one summary per key, preserving the order of `keys`.
///
/// A key that no table holds means the registry and the tables disagree,
/// which is reported as [`AggregatorError::MissingKey`].
pub fn merge_tables<K: AsRef<[u8]>>(
    keys: &[K],
    tables: &[PartitionTable],
) -> Result<Vec<StationSummary>> {
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            let hash = hash_key(key);

            let merged = tables
                .iter()
                .filter_map(|table| table.get(hash, key))
                .fold(None::<Accumulator>, |merged, stats| match merged {
                    Some(mut merged) => {
                        merged.merge(stats);
                        Some(merged)
                    }
                    None => Some(*stats),
                })
                .ok_or_else(|| AggregatorError::missing_key(key))?;

            Ok(StationSummary::new(key, merged))
        })
        .collect()
}
