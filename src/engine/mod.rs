//! Aggregation engine
//!
//! Leaf-first: [`decimal`] and [`hasher`] parse one record, [`table`] holds
//! one worker's per-station [`accumulator`]s, [`chunker`] and [`worker`] split
//! and scan the input, [`registry`] and [`merger`] combine the partitions and
//! [`formatter`] renders the result. [`pipeline`] ties them together.

pub mod accumulator;
pub mod chunker;
pub mod decimal;
pub mod formatter;
pub mod hasher;
pub mod merger;
pub mod pipeline;
pub mod registry;
pub mod streaming;
pub mod table;
pub mod worker;

pub use accumulator::Accumulator;
pub use formatter::{OutputFormat, format_summary, write_summary};
pub use pipeline::Aggregator;
pub use registry::KeyRegistry;
pub use table::PartitionTable;

#[cfg(test)]
mod tests;
