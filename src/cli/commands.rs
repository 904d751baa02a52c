//! Command execution for the weather aggregator CLI
//!
//! Opens the input, runs the engine with a progress spinner, writes the
//! summary to the chosen sink and reports run statistics on stderr and,
//! optionally, as a JSON report file.

use crate::cli::args::Args;
use crate::engine::{Aggregator, write_summary};
use crate::models::{AggregationResult, RunStats};
use crate::source::MappedFile;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weather_aggregator={}", log_level)));

    // Ignore the error if a subscriber is already installed (tests)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(io::stderr),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Create a spinner for the aggregation phase
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Main command runner
pub fn run(args: Args) -> Result<RunStats> {
    let start_time = Instant::now();
    args.validate()?;

    let config = args.to_config();
    let aggregator = Aggregator::new(config)?;
    info!(
        "Aggregating {} with {} workers",
        args.input.display(),
        aggregator.config().workers
    );

    let spinner = args
        .show_progress()
        .then(|| create_spinner(&format!("Aggregating {}...", args.input.display())));

    let result = aggregate_input(&args, &aggregator);

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let AggregationResult { stations, stats } = result?;

    let format = args.format.into();
    if args.stdout {
        let stdout = io::stdout();
        let mut sink = BufWriter::new(stdout.lock());
        write_summary(&mut sink, &stations, format).context("failed to write summary to stdout")?;
    } else {
        let file = File::create(&args.output)
            .with_context(|| format!("failed to create output file {}", args.output.display()))?;
        let mut sink = BufWriter::new(file);
        write_summary(&mut sink, &stations, format)
            .with_context(|| format!("failed to write output file {}", args.output.display()))?;
    }

    if let Some(report_path) = &args.report {
        write_report(report_path, &args, &stats)?;
    }

    if !args.quiet {
        print_summary(&args, &stats, start_time.elapsed());
    }

    Ok(stats)
}

fn aggregate_input(args: &Args, aggregator: &Aggregator) -> Result<AggregationResult> {
    if args.streaming {
        let file = File::open(&args.input)
            .with_context(|| format!("failed to open {}", args.input.display()))?;
        return aggregator
            .aggregate_reader(BufReader::new(file))
            .with_context(|| format!("failed to aggregate {}", args.input.display()));
    }

    let source = MappedFile::open(&args.input)?;
    aggregator
        .aggregate(&source)
        .with_context(|| format!("failed to aggregate {}", source.path().display()))
}

/// Write the run statistics as JSON for machine consumption
fn write_report(path: &Path, args: &Args, stats: &RunStats) -> Result<()> {
    let report = serde_json::json!({
        "input": args.input.display().to_string(),
        "input_bytes": stats.input_bytes,
        "records": stats.records,
        "stations": stats.stations,
        "skipped_lines": stats.skipped_lines,
        "chunks": stats.chunks,
        "workers": stats.workers,
        "streaming": args.streaming,
        "elapsed_seconds": stats.elapsed.as_secs_f64(),
        "throughput_mb_per_sec": stats.throughput_mb_per_sec(),
    });

    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write report {}", path.display()))?;

    debug!("Run report written to {}", path.display());
    Ok(())
}

fn print_summary(args: &Args, stats: &RunStats, elapsed: Duration) {
    eprintln!("{}", "Aggregation Summary".bright_green().bold());
    eprintln!(
        "  {} {}",
        "Stations:".bright_cyan(),
        stats.stations.to_string().bright_white().bold()
    );
    eprintln!(
        "  {} {}",
        "Records:".bright_cyan(),
        stats.records.to_string().bright_white()
    );
    if stats.skipped_lines > 0 {
        eprintln!(
            "  {} {}",
            "Skipped lines:".bright_yellow(),
            stats.skipped_lines.to_string().bright_yellow()
        );
    }
    eprintln!(
        "  {} {} chunks on {} workers ({:.1} MB/s)",
        "Partitions:".bright_cyan(),
        stats.chunks,
        stats.workers,
        stats.throughput_mb_per_sec()
    );
    if !args.stdout {
        eprintln!("  {} {}", "Output:".bright_cyan(), args.output.display());
    }
    eprintln!("  {} {:.2?}", "Elapsed time:".bright_cyan(), elapsed);
}
