//! Weather Aggregator Library
//!
//! Computes per-station minimum, mean and maximum temperatures from large
//! `station;temperature` measurement files in a single parallel pass.
//!
//! This library provides tools for:
//! - Fixed-point parsing of bounded-format measurements
//! - Hashing station names in the same scan that finds the field delimiter
//! - Fixed-capacity, collision-checked partition tables per worker
//! - Newline-aligned partitioning of the input across worker threads
//! - Merging partitions and rendering a deterministic, sorted summary

pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;
pub mod source;

// Re-export commonly used types
pub use config::AggregatorConfig;
pub use engine::{Aggregator, OutputFormat, format_summary, write_summary};
pub use error::{AggregatorError, Result};
pub use models::{AggregationResult, RunStats, StationSummary};
pub use source::{ByteSource, MappedFile};
