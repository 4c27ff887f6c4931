//! # CLI Interface
//!
//! Defines the command-line argument structure for `streams` using `clap`
//! derive. Subcommands: `evaluate`, `format`, `parse`, and `version`.

use std::path::PathBuf;

use buidl_streams::config::{BALANCE_DISPLAY_DECIMALS, NATIVE_DECIMALS};
use clap::{Parser, Subcommand};

/// Builder stream inspector.
///
/// Evaluates stream snapshots exported by the chain-state reader and prints
/// what each stream has unlocked, whether it is under-funded, and the same
/// display strings the dashboard shows.
#[derive(Parser, Debug)]
#[command(
    name = "streams",
    about = "Builder stream allowance inspector",
    version,
    propagate_version = true
)]
pub struct StreamsCli {
    /// Log format on stderr: `pretty` or `json`.
    #[arg(long, global = true, env = "STREAMS_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate one or more stream snapshots from a JSON file.
    Evaluate(EvaluateArgs),
    /// Format a smallest-unit integer as a decimal string.
    Format(FormatArgs),
    /// Parse a decimal string into smallest units.
    Parse(ParseArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `evaluate` subcommand.
#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// JSON file holding one snapshot object or an array of them.
    #[arg(long, short = 's')]
    pub snapshot: PathBuf,

    /// Evaluation instant in Unix seconds. Defaults to the wall clock.
    #[arg(long, env = "STREAMS_NOW", allow_negative_numbers = true)]
    pub now: Option<i64>,

    /// Fractional digits of the streamed asset.
    #[arg(long, env = "STREAMS_DECIMALS", default_value_t = NATIVE_DECIMALS)]
    pub decimals: u8,

    /// Emit a JSON report instead of one line per stream.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `format` subcommand.
#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Amount in smallest units.
    pub units: String,

    /// Fractional digits of the asset.
    #[arg(long, env = "STREAMS_DECIMALS", default_value_t = NATIVE_DECIMALS)]
    pub decimals: u8,

    /// Places to show after the decimal point.
    #[arg(long, default_value_t = BALANCE_DISPLAY_DECIMALS)]
    pub places: u8,
}

/// Arguments for the `parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Decimal amount, e.g. `12.5`.
    pub amount: String,

    /// Fractional digits of the asset.
    #[arg(long, env = "STREAMS_DECIMALS", default_value_t = NATIVE_DECIMALS)]
    pub decimals: u8,
}
