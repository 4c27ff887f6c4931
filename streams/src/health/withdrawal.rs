//! Withdrawal eligibility.
//!
//! Mirrors the contract's withdraw guard so the UI can reject a request
//! before the builder signs anything. The contract remains the authority;
//! this only predicts its answer from the same snapshot.

use thiserror::Error;

use super::summary::{StreamSummary, Summary};
use crate::amount::Amount;

/// Why a withdrawal request would be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WithdrawalError {
    /// The builder has no active stream.
    #[error("no active stream")]
    NoStream,

    /// Zero-amount withdrawals are refused.
    #[error("withdrawal amount must be positive")]
    ZeroAmount,

    /// More than the unlocked portion of the cap.
    #[error("requested {requested} exceeds unlocked allowance {unlocked}")]
    ExceedsUnlocked {
        /// Requested amount in smallest units.
        requested: Amount,
        /// Currently unlocked amount.
        unlocked: Amount,
    },

    /// Within the allowance, but more than the stream holds.
    #[error("requested {requested} exceeds stream balance {balance}")]
    ExceedsBalance {
        /// Requested amount in smallest units.
        requested: Amount,
        /// Funds held by the stream.
        balance: Amount,
    },
}

impl StreamSummary {
    /// Checks whether `requested` could be withdrawn right now.
    ///
    /// The allowance is checked before the balance, so an under-funded
    /// stream reports `ExceedsBalance` only for requests it would otherwise
    /// have allowed.
    pub fn check_withdrawal(&self, requested: Amount) -> Result<(), WithdrawalError> {
        if requested.is_zero() {
            return Err(WithdrawalError::ZeroAmount);
        }
        if requested > self.available_amount {
            return Err(WithdrawalError::ExceedsUnlocked {
                requested,
                unlocked: self.available_amount,
            });
        }
        if requested > self.balance_amount {
            return Err(WithdrawalError::ExceedsBalance {
                requested,
                balance: self.balance_amount,
            });
        }
        Ok(())
    }
}

impl Summary {
    /// [`StreamSummary::check_withdrawal`], refusing everything when there
    /// is no stream.
    pub fn check_withdrawal(&self, requested: Amount) -> Result<(), WithdrawalError> {
        match self {
            Summary::NoStream => Err(WithdrawalError::NoStream),
            Summary::Active(summary) => summary.check_withdrawal(requested),
        }
    }
}
