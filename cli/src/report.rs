//! # Snapshot Reports
//!
//! Loads snapshot files and turns each entry into an [`EvaluationReport`].
//! One bad entry does not stop the rest: its error is recorded in the
//! report and counted by the caller.

use std::path::Path;

use anyhow::{Context, Result};
use buidl_streams::{summarize_at, DisplayConfig, StreamDisplay, StreamSnapshot, StreamState, Summary};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A snapshot file holds a single object or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Many(Vec<StreamSnapshot>),
    One(StreamSnapshot),
}

/// Reads and decodes `path`.
pub fn load_snapshots(path: &Path) -> Result<Vec<StreamSnapshot>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    let file: SnapshotFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to decode snapshot file {}", path.display()))?;

    let snapshots = match file {
        SnapshotFile::Many(all) => all,
        SnapshotFile::One(single) => vec![single],
    };
    debug!(count = snapshots.len(), path = %path.display(), "loaded snapshots");
    Ok(snapshots)
}

/// Outcome for one snapshot entry.
#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<StreamDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationReport {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Validates and evaluates every snapshot at `now`.
pub fn evaluate_all(
    snapshots: &[StreamSnapshot],
    now: i64,
    config: &DisplayConfig,
) -> Vec<EvaluationReport> {
    snapshots
        .iter()
        .enumerate()
        .map(|(index, snapshot)| match StreamState::from_snapshot(snapshot, config.decimals) {
            Ok(state) => {
                let summary = summarize_at(&state, now);
                EvaluationReport {
                    index,
                    summary: Some(summary),
                    display: summary.active().map(|active| active.display(config)),
                    error: None,
                }
            }
            Err(e) => {
                warn!(index, error = %e, "rejected snapshot");
                EvaluationReport {
                    index,
                    summary: None,
                    display: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

/// One human-readable line per report.
pub fn render_line(report: &EvaluationReport) -> String {
    if let Some(error) = &report.error {
        return format!("#{}  error: {}", report.index, error);
    }
    match &report.display {
        None => format!("#{}  no active stream", report.index),
        Some(d) => format!(
            "#{}  {} / {} unlocked ({}%, {}-day period)  balance {}{}",
            report.index,
            d.available,
            d.cap,
            d.progress_percent,
            d.period_days,
            d.balance,
            if d.underfunded { "  UNDERFUNDED" } else { "" },
        ),
    }
}
