//! # Allowance Accrual
//!
//! A stream unlocks its cap linearly over one period, measured from the
//! last withdrawal or reset, and saturates at the cap:
//!
//! ```text
//! elapsed  = max(0, now - last_event_timestamp)
//! unlocked = min(cap, floor(cap * elapsed / frequency))
//! ```
//!
//! The contract resets `last_event_timestamp` on every withdrawal, so time
//! beyond one period never accrues a second cap. [`evaluate`] is the single
//! implementation every display and eligibility path goes through.

use std::num::NonZeroU64;

use serde::Serialize;

use super::state::StreamState;
use crate::amount::{mul_div, Amount, Ratio};

/// Everything derived from a [`StreamState`] at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllowanceResult {
    /// `max(0, now - last_event_timestamp)`.
    pub elapsed_seconds: u64,
    /// Portion of the cap currently withdrawable, in smallest units.
    pub unlocked_amount: Amount,
    /// `elapsed / frequency` clamped to `[0, 1]`. Display only.
    pub unlocked_fraction: Ratio,
    /// `true` when the stream holds less than it has unlocked.
    pub underfunded: bool,
}

impl AllowanceResult {
    /// Amount of the cap still waiting to unlock.
    pub fn remaining_to_unlock(&self, state: &StreamState) -> Amount {
        state.cap().saturating_sub(self.unlocked_amount)
    }

    /// `true` once the whole cap is available. A zero-cap stream has
    /// nothing left to unlock, so it is saturated from the start even
    /// though its period fraction keeps advancing.
    pub fn is_saturated(&self, state: &StreamState) -> bool {
        self.remaining_to_unlock(state).is_zero()
    }
}

/// Evaluates `state` as of `now` (Unix seconds).
///
/// Pure and infallible: a `now` earlier than the last event (clock skew)
/// yields zero elapsed time, and the frequency is known to be positive.
pub fn evaluate(state: &StreamState, now: i64) -> AllowanceResult {
    let frequency = state.frequency();
    let elapsed = state.elapsed_at(now);
    let cap = state.cap();

    let unlocked_amount = if elapsed >= frequency.get() {
        cap
    } else {
        accrued(cap, elapsed, frequency)
    };

    AllowanceResult {
        elapsed_seconds: elapsed,
        unlocked_amount,
        unlocked_fraction: Ratio::clamped_unit(elapsed, frequency),
        underfunded: state.current_balance() < unlocked_amount,
    }
}

/// `floor(cap * elapsed / frequency)` for `elapsed < frequency`.
///
/// The divisor is non-zero and the quotient is below `cap`, so neither
/// `mul_div` error can occur here.
fn accrued(cap: Amount, elapsed: u64, frequency: NonZeroU64) -> Amount {
    debug_assert!(elapsed < frequency.get());
    let units = mul_div(cap.units(), elapsed as u128, frequency.get() as u128);
    debug_assert!(units.is_ok(), "accrual below one period cannot overflow");
    Amount::from_units(units.unwrap_or(0)).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEI: u128 = 1_000_000_000_000_000_000;
    const THIRTY_DAYS: i64 = 2_592_000;
    const T: i64 = 1_700_000_000;

    fn stream(cap_whole: u128, balance_whole: u128) -> StreamState {
        StreamState::new(
            Amount::from_units(cap_whole * WEI),
            THIRTY_DAYS,
            T,
            Amount::from_units(balance_whole * WEI),
        )
        .unwrap()
    }

    #[test]
    fn nothing_unlocked_at_last_event() {
        let result = evaluate(&stream(500, 500), T);
        assert_eq!(result.elapsed_seconds, 0);
        assert_eq!(result.unlocked_amount, Amount::ZERO);
        assert!(result.unlocked_fraction.is_zero());
        assert!(!result.underfunded);
    }

    #[test]
    fn half_period_unlocks_half_cap() {
        let result = evaluate(&stream(500, 500), T + THIRTY_DAYS / 2);
        assert_eq!(result.unlocked_amount, Amount::from_units(250 * WEI));
        assert_eq!(result.unlocked_fraction, Ratio::new(1, 2).unwrap());
    }

    #[test]
    fn saturates_after_full_period() {
        let state = stream(500, 500);
        for now in [T + THIRTY_DAYS, T + 2 * THIRTY_DAYS, i64::MAX] {
            let result = evaluate(&state, now);
            assert_eq!(result.unlocked_amount, state.cap());
            assert!(result.is_saturated(&state));
        }
    }

    #[test]
    fn clock_skew_reads_as_zero() {
        let result = evaluate(&stream(500, 500), T - 3_600);
        assert_eq!(result.elapsed_seconds, 0);
        assert_eq!(result.unlocked_amount, Amount::ZERO);
    }

    #[test]
    fn floors_partial_units() {
        let state = StreamState::new(Amount::from_units(10), 3, 0, Amount::ZERO).unwrap();
        assert_eq!(evaluate(&state, 1).unlocked_amount, Amount::from_units(3));
        assert_eq!(evaluate(&state, 2).unlocked_amount, Amount::from_units(6));
        assert_eq!(evaluate(&state, 3).unlocked_amount, Amount::from_units(10));
    }

    #[test]
    fn huge_cap_does_not_overflow() {
        let cap = Amount::from_units(u128::MAX);
        let state = StreamState::new(cap, 1_000, 0, cap).unwrap();
        let result = evaluate(&state, 999);
        assert!(result.unlocked_amount < cap);
        assert_eq!(
            result.unlocked_amount,
            Amount::from_units(mul_div(u128::MAX, 999, 1_000).unwrap())
        );
    }

    #[test]
    fn zero_cap_is_never_underfunded() {
        let result = evaluate(&stream(0, 0), T + THIRTY_DAYS);
        assert_eq!(result.unlocked_amount, Amount::ZERO);
        assert!(!result.underfunded);
    }

    #[test]
    fn zero_cap_is_saturated_before_the_period_ends() {
        let state = stream(0, 0);
        let result = evaluate(&state, T + THIRTY_DAYS / 3);
        assert!(!result.unlocked_fraction.is_complete());
        assert!(result.is_saturated(&state));

        let partial = evaluate(&stream(500, 500), T + THIRTY_DAYS / 3);
        assert!(!partial.is_saturated(&stream(500, 500)));
    }

    #[test]
    fn fraction_uses_the_typed_frequency() {
        let state = stream(500, 500);
        assert_eq!(state.frequency().get(), THIRTY_DAYS as u64);
        let result = evaluate(&state, T + THIRTY_DAYS / 4);
        assert_eq!(result.unlocked_fraction, Ratio::new(1, 4).unwrap());
    }

    #[test]
    fn underfunded_when_balance_below_unlocked() {
        let result = evaluate(&stream(100, 40), T + THIRTY_DAYS * 3 / 5);
        assert_eq!(result.unlocked_amount, Amount::from_units(60 * WEI));
        assert!(result.underfunded);
    }

    #[test]
    fn remaining_to_unlock_complements_unlocked() {
        let state = stream(500, 500);
        let result = evaluate(&state, T + THIRTY_DAYS / 5);
        assert_eq!(result.unlocked_amount, Amount::from_units(100 * WEI));
        assert_eq!(result.remaining_to_unlock(&state), Amount::from_units(400 * WEI));
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let state = stream(123, 7);
        let now = T + 777_777;
        assert_eq!(evaluate(&state, now), evaluate(&state, now));
    }
}
