//! Subcommand bodies.
//!
//! Each command writes its report to the writer it is given (stdout in
//! `main`) and returns an error for anything that should end the process
//! with a non-zero status.

use std::io::Write;

use anyhow::{bail, ensure, Context, Result};
use tracing::info;

use buidl_streams::config::MAX_SUPPORTED_DECIMALS;
use buidl_streams::{format_amount, parse_amount, Amount, DisplayConfig};

use crate::cli::{EvaluateArgs, FormatArgs, ParseArgs};
use crate::report;

fn check_decimals(decimals: u8) -> Result<()> {
    ensure!(
        decimals <= MAX_SUPPORTED_DECIMALS,
        "unsupported precision: {} decimals (max {})",
        decimals,
        MAX_SUPPORTED_DECIMALS
    );
    Ok(())
}

/// Evaluates every snapshot in the file and writes one report per entry.
/// Fails after writing if any entry was rejected.
pub fn evaluate(args: &EvaluateArgs, out: &mut impl Write) -> Result<()> {
    check_decimals(args.decimals)?;

    let now = args.now.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let config = DisplayConfig::with_decimals(args.decimals);
    let snapshots = report::load_snapshots(&args.snapshot)?;

    info!(count = snapshots.len(), now, "evaluating snapshots");
    let reports = report::evaluate_all(&snapshots, now, &config);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &reports).context("failed to encode report")?;
        writeln!(out)?;
    } else {
        for r in &reports {
            writeln!(out, "{}", report::render_line(r))?;
        }
    }

    let failed = reports.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        bail!("{} of {} snapshots were rejected", failed, reports.len());
    }
    Ok(())
}

pub fn format(args: &FormatArgs, out: &mut impl Write) -> Result<()> {
    check_decimals(args.decimals)?;
    let amount: Amount = args
        .units
        .parse()
        .with_context(|| format!("invalid unit count {:?}", args.units))?;
    writeln!(out, "{}", format_amount(amount, args.decimals, args.places))?;
    Ok(())
}

pub fn parse(args: &ParseArgs, out: &mut impl Write) -> Result<()> {
    check_decimals(args.decimals)?;
    let amount = parse_amount(&args.amount, args.decimals)
        .with_context(|| format!("invalid amount {:?}", args.amount))?;
    writeln!(out, "{}", amount)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const T: i64 = 1_700_000_000;

    fn run<F>(command: F) -> (Result<()>, String)
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        let result = command(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn evaluate_args(snapshot: PathBuf, decimals: u8, json: bool) -> EvaluateArgs {
        EvaluateArgs {
            snapshot,
            now: Some(T + 1_296_000),
            decimals,
            json,
        }
    }

    fn snapshot_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const MIXED: &str = r#"[
        {"cap":"500","frequencySeconds":2592000,"lastEventTimestamp":1700000000,"currentBalance":"500"},
        {"cap":"500","frequencySeconds":0,"lastEventTimestamp":1700000000,"currentBalance":"500"}
    ]"#;

    #[test]
    fn evaluate_reports_every_entry_then_fails_on_rejects() {
        let file = snapshot_file(MIXED);
        let args = evaluate_args(file.path().to_path_buf(), 18, false);
        let (result, output) = run(|out| evaluate(&args, out));

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 snapshots were rejected");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#0  250.0000 / 500.0 unlocked (50%"));
        assert!(lines[1].starts_with("#1  error:"));
    }

    #[test]
    fn evaluate_succeeds_when_all_entries_are_valid() {
        let file = snapshot_file(
            r#"{"cap":"500","frequencySeconds":2592000,"lastEventTimestamp":1700000000,"currentBalance":"500"}"#,
        );
        let args = evaluate_args(file.path().to_path_buf(), 18, true);
        let (result, output) = run(|out| evaluate(&args, out));

        result.unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json[0]["summary"]["status"], "active");
        assert_eq!(json[0]["display"]["available"], "250.0000");
    }

    #[test]
    fn format_rounds_to_the_requested_places() {
        let args = FormatArgs {
            units: "1234550000000000000".into(),
            decimals: 18,
            places: 4,
        };
        let (result, output) = run(|out| format(&args, out));
        result.unwrap();
        assert_eq!(output, "1.2346\n");
    }

    #[test]
    fn parse_prints_smallest_units() {
        let args = ParseArgs {
            amount: "0.5".into(),
            decimals: 18,
        };
        let (result, output) = run(|out| parse(&args, out));
        result.unwrap();
        assert_eq!(output, "500000000000000000\n");
    }

    #[test]
    fn precision_above_the_limit_is_refused_everywhere() {
        let file = snapshot_file(MIXED);

        let args = evaluate_args(file.path().to_path_buf(), 39, false);
        let (result, output) = run(|out| evaluate(&args, out));
        assert!(result.unwrap_err().to_string().contains("unsupported precision"));
        assert!(output.is_empty());

        let (result, _) = run(|out| {
            format(
                &FormatArgs {
                    units: "1".into(),
                    decimals: 39,
                    places: 4,
                },
                out,
            )
        });
        assert!(result.unwrap_err().to_string().contains("unsupported precision"));

        let (result, _) = run(|out| {
            parse(
                &ParseArgs {
                    amount: "1".into(),
                    decimals: 39,
                },
                out,
            )
        });
        assert!(result.unwrap_err().to_string().contains("unsupported precision"));
    }

    #[test]
    fn malformed_inputs_carry_context() {
        let (result, _) = run(|out| {
            parse(
                &ParseArgs {
                    amount: ".5".into(),
                    decimals: 18,
                },
                out,
            )
        });
        assert!(result.unwrap_err().to_string().starts_with("invalid amount"));

        let (result, _) = run(|out| {
            format(
                &FormatArgs {
                    units: "1.5".into(),
                    decimals: 18,
                    places: 4,
                },
                out,
            )
        });
        assert!(result.unwrap_err().to_string().starts_with("invalid unit count"));
    }
}
