//! # Stream State
//!
//! A [`StreamState`] is a validated snapshot of one builder stream as the
//! contract reports it. Validation happens once, here, so the calculator
//! can assume a positive frequency and never needs an error path.
//!
//! Raw reader output arrives as a [`StreamSnapshot`] with decimal strings
//! for the money fields; [`StreamState::from_snapshot`] is the boundary
//! where that input is checked.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::amount::{parse_amount, Amount, ParseError};
use crate::error::{StreamError, StreamResult};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A stream snapshot that violates the state invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStreamState {
    /// The replenishment period was zero or negative.
    #[error("stream frequency must be positive, got {0} seconds")]
    NonPositiveFrequency(i64),

    /// A money field was negative.
    #[error("stream {field} must not be negative")]
    NegativeAmount {
        /// Name of the offending snapshot field.
        field: &'static str,
    },
}

// ---------------------------------------------------------------------------
// StreamSnapshot
// ---------------------------------------------------------------------------

/// One stream as delivered by the chain-state reader, before validation.
///
/// Money fields are human decimal strings (`"0.5"`), matching what the
/// reader produces after formatting contract values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSnapshot {
    /// Maximum releasable per period.
    pub cap: String,
    /// Period length in seconds.
    pub frequency_seconds: i64,
    /// Unix seconds of the last withdrawal or reset.
    pub last_event_timestamp: i64,
    /// Funds actually held by the stream contract.
    pub current_balance: String,
}

// ---------------------------------------------------------------------------
// StreamState
// ---------------------------------------------------------------------------

/// A validated stream snapshot. Fields are private so the positive-frequency
/// invariant cannot be broken after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamState {
    cap: Amount,
    frequency_seconds: NonZeroU64,
    last_event_timestamp: i64,
    current_balance: Amount,
}

impl StreamState {
    /// Builds a state from typed values.
    ///
    /// # Errors
    ///
    /// [`InvalidStreamState::NonPositiveFrequency`] when
    /// `frequency_seconds <= 0`.
    pub fn new(
        cap: Amount,
        frequency_seconds: i64,
        last_event_timestamp: i64,
        current_balance: Amount,
    ) -> Result<Self, InvalidStreamState> {
        let frequency_seconds = u64::try_from(frequency_seconds)
            .ok()
            .and_then(NonZeroU64::new)
            .ok_or(InvalidStreamState::NonPositiveFrequency(frequency_seconds))?;

        Ok(Self {
            cap,
            frequency_seconds,
            last_event_timestamp,
            current_balance,
        })
    }

    /// Validates a reader snapshot, parsing money fields at `decimals`
    /// precision.
    ///
    /// # Errors
    ///
    /// - [`StreamError::InvalidState`] for negative amounts or a
    ///   non-positive frequency.
    /// - [`StreamError::Parse`] for any other malformed amount string,
    ///   tagged with the field name.
    pub fn from_snapshot(snapshot: &StreamSnapshot, decimals: u8) -> StreamResult<Self> {
        let cap = parse_field("cap", &snapshot.cap, decimals)?;
        let current_balance = parse_field("currentBalance", &snapshot.current_balance, decimals)?;

        Self::new(
            cap,
            snapshot.frequency_seconds,
            snapshot.last_event_timestamp,
            current_balance,
        )
        .map_err(|err| {
            debug!(error = %err, "rejected stream snapshot");
            StreamError::from(err)
        })
    }

    pub fn cap(&self) -> Amount {
        self.cap
    }

    pub fn frequency_seconds(&self) -> u64 {
        self.frequency_seconds.get()
    }

    /// The period length, typed so it can divide without a zero check.
    pub fn frequency(&self) -> NonZeroU64 {
        self.frequency_seconds
    }

    pub fn last_event_timestamp(&self) -> i64 {
        self.last_event_timestamp
    }

    pub fn current_balance(&self) -> Amount {
        self.current_balance
    }

    /// `true` when there is nothing to stream (`cap == 0`).
    pub fn is_inactive(&self) -> bool {
        self.cap.is_zero()
    }

    /// Seconds elapsed since the last event, floored at zero so a snapshot
    /// stamped in the future reads as "just reset".
    pub fn elapsed_at(&self, now: i64) -> u64 {
        let elapsed = (now as i128) - (self.last_event_timestamp as i128);
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Seconds until the full cap is unlocked, zero once saturated.
    pub fn seconds_until_full(&self, now: i64) -> u64 {
        self.frequency_seconds().saturating_sub(self.elapsed_at(now))
    }
}

fn parse_field(field: &'static str, raw: &str, decimals: u8) -> StreamResult<Amount> {
    parse_amount(raw, decimals).map_err(|source| {
        debug!(field, error = %source, "rejected stream snapshot amount");
        match source {
            ParseError::Negative => InvalidStreamState::NegativeAmount { field }.into(),
            source => StreamError::Parse { field, source },
        }
    })
}
