//! # Stream Summaries
//!
//! Turns an [`AllowanceResult`] into the payload the dashboard renders:
//! exact amounts, progress, the under-funded flag, and preformatted strings.
//! A stream with a zero cap is not a stream at all, so it gets its own
//! [`Summary::NoStream`] variant instead of a row of zeros.

use std::num::NonZeroU64;

use serde::Serialize;
use tracing::debug;

use crate::allowance::{evaluate, AllowanceResult, StreamState};
use crate::amount::{Amount, Ratio};
use crate::config::{DisplayConfig, SECONDS_PER_DAY};

const DAY: NonZeroU64 = match NonZeroU64::new(SECONDS_PER_DAY) {
    Some(day) => day,
    None => panic!("SECONDS_PER_DAY must be positive"),
};

/// Result of [`summarize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Summary {
    /// The builder has no active stream (`cap == 0`).
    NoStream,
    /// An active stream.
    Active(StreamSummary),
}

impl Summary {
    /// The active summary, if any.
    pub fn active(&self) -> Option<&StreamSummary> {
        match self {
            Summary::NoStream => None,
            Summary::Active(summary) => Some(summary),
        }
    }

    pub fn is_underfunded(&self) -> bool {
        self.active().is_some_and(|s| s.underfunded)
    }
}

/// Health and progress of an active stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    /// Unlocked portion of the cap.
    pub available_amount: Amount,
    /// Maximum per period.
    pub cap_amount: Amount,
    /// Funds held by the stream.
    pub balance_amount: Amount,
    /// Progress through the current period, in `[0, 1]`.
    pub unlocked_fraction: Ratio,
    /// `balance_amount < available_amount`.
    pub underfunded: bool,
    /// Period length in days.
    pub period_days: Ratio,
}

/// Preformatted strings for one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDisplay {
    pub available: String,
    pub cap: String,
    pub balance: String,
    pub progress_percent: String,
    pub period_days: String,
    pub underfunded: bool,
}

impl StreamSummary {
    /// What a withdrawal can take right now: the unlocked amount, limited
    /// by what the stream actually holds.
    pub fn withdrawable(&self) -> Amount {
        self.available_amount.min(self.balance_amount)
    }

    /// Shortfall between the unlocked amount and the balance.
    pub fn shortfall(&self) -> Amount {
        self.available_amount.saturating_sub(self.balance_amount)
    }

    /// Formats every field with the configured places and the one shared
    /// rounding rule.
    pub fn display(&self, config: &DisplayConfig) -> StreamDisplay {
        StreamDisplay {
            available: self
                .available_amount
                .to_decimal_string(config.decimals, config.balance_places),
            cap: self
                .cap_amount
                .to_decimal_string(config.decimals, config.cap_places),
            balance: self
                .balance_amount
                .to_decimal_string(config.decimals, config.balance_places),
            progress_percent: self.unlocked_fraction.percent_string(config.progress_places),
            period_days: self.period_days.to_decimal_string(config.period_places),
            underfunded: self.underfunded,
        }
    }
}

/// Builds the summary for `state` given its already-computed `result`.
///
/// No arithmetic happens for a zero-cap stream.
pub fn summarize(state: &StreamState, result: &AllowanceResult) -> Summary {
    if state.is_inactive() {
        return Summary::NoStream;
    }

    let available_amount = result.unlocked_amount;
    let balance_amount = state.current_balance();
    let underfunded = balance_amount < available_amount;

    if underfunded {
        debug!(
            available = %available_amount,
            balance = %balance_amount,
            "stream is under-funded"
        );
    }

    Summary::Active(StreamSummary {
        available_amount,
        cap_amount: state.cap(),
        balance_amount,
        unlocked_fraction: result.unlocked_fraction,
        underfunded,
        period_days: Ratio::of(state.frequency_seconds(), DAY),
    })
}

/// [`evaluate`] followed by [`summarize`].
pub fn summarize_at(state: &StreamState, now: i64) -> Summary {
    summarize(state, &evaluate(state, now))
}
