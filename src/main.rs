use clap::Parser;
use std::process;
use weather_aggregator::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    commands::setup_logging(&args);

    match commands::run(args) {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
