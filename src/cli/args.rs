//! Command-line argument definitions for the weather aggregator
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::AggregatorConfig;
use crate::constants::{DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_TABLE_CAPACITY};
use crate::engine::OutputFormat;
use crate::error::{AggregatorError, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the weather aggregator
///
/// Reads a `station;temperature` measurement file and writes the per-station
/// min/mean/max summary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "weather-aggregator",
    version,
    about = "Aggregate station temperature measurements into min/mean/max summaries",
    long_about = "Reads a file of `station;temperature` records (one per line, temperatures \
                  with exactly one fractional digit) and writes a single-line summary \
                  `{Station=min/mean/max, ...}` sorted by station name. The input is \
                  memory-mapped and scanned by parallel workers."
)]
pub struct Args {
    /// Measurement file to aggregate
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// File the summary is written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Write the summary to stdout instead of the output file
    #[arg(long)]
    pub stdout: bool,

    /// Number of worker threads (defaults to available parallelism)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Target chunk size in bytes (defaults to input size / workers)
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Slots per worker table; should be at least 4x the number of stations
    #[arg(long, default_value_t = DEFAULT_TABLE_CAPACITY)]
    pub table_capacity: usize,

    /// Read the input in blocks instead of memory-mapping it
    #[arg(long)]
    pub streaming: bool,

    /// Summary format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Write run statistics as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and hide the progress spinner
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// `{Station=min/mean/max, ...}`
    Text,
    /// JSON array for scripting
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Args {
    /// Validate arguments before any work starts
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(AggregatorError::configuration(format!(
                "Input file does not exist: {}",
                self.input.display()
            )));
        }

        if self.input.is_dir() {
            return Err(AggregatorError::configuration(format!(
                "Input path is a directory: {}",
                self.input.display()
            )));
        }

        if self.workers == Some(0) {
            return Err(AggregatorError::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if self.chunk_size == Some(0) {
            return Err(AggregatorError::configuration(
                "Chunk size must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Build the engine configuration from the defaults and any overrides
    pub fn to_config(&self) -> AggregatorConfig {
        let mut config = AggregatorConfig::default().with_table_capacity(self.table_capacity);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(chunk_size) = self.chunk_size {
            config = config.with_chunk_size(chunk_size);
        }
        config
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show the progress spinner (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
