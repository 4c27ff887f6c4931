// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Streams Inspector
//!
//! Entry point for the `streams` binary. Parses CLI arguments, initializes
//! logging, and runs one of four subcommands:
//!
//! - `evaluate`: summarize stream snapshots from a JSON file
//! - `format`: render smallest units as a decimal string
//! - `parse`: turn a decimal string into smallest units
//! - `version`: print build version information
//!
//! Reports go to stdout, logs to stderr.

mod cli;
mod commands;
mod logging;
mod report;

use anyhow::Result;
use clap::Parser;

use cli::{Commands, StreamsCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = StreamsCli::parse();

    logging::init_logging(
        "streams=info,buidl_streams=warn",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Evaluate(args) => commands::evaluate(&args, &mut out),
        Commands::Format(args) => commands::format(&args, &mut out),
        Commands::Parse(args) => commands::parse(&args, &mut out),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Prints version information for the binary and the library.
fn print_version() {
    println!("streams        {}", env!("CARGO_PKG_VERSION"));
    println!("buidl-streams  {}", buidl_streams::VERSION);
    println!("rustc          {}", rustc_version());
}

/// Returns the rustc version used to compile this binary.
/// Falls back to "unknown" if not available at compile time.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
