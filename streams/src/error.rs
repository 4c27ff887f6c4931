//! Crate-level error type.
//!
//! Each module owns its own error enum; [`StreamError`] collects the ones
//! that can surface where external input enters the crate, so callers
//! holding a raw snapshot have a single type to match on.

use thiserror::Error;

use crate::allowance::InvalidStreamState;
use crate::amount::{ArithmeticError, ParseError};
use crate::health::WithdrawalError;

/// Errors raised at the input boundary of the stream mirror.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A money field could not be parsed.
    #[error("invalid {field}: {source}")]
    Parse {
        /// Snapshot field the value came from.
        field: &'static str,
        /// Underlying parse failure.
        #[source]
        source: ParseError,
    },

    /// The snapshot violates a state invariant.
    #[error("invalid stream state: {0}")]
    InvalidState(#[from] InvalidStreamState),

    /// Wide arithmetic did not fit the provisioned width.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    /// A withdrawal request was refused.
    #[error(transparent)]
    Withdrawal(#[from] WithdrawalError),
}

/// Convenience alias used across the crate.
pub type StreamResult<T> = Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_names_field() {
        let err = StreamError::Parse {
            field: "cap",
            source: ParseError::Empty,
        };
        assert_eq!(err.to_string(), "invalid cap: empty amount string");
    }

    #[test]
    fn invalid_state_converts() {
        let err: StreamError = InvalidStreamState::NonPositiveFrequency(0).into();
        assert_eq!(
            err.to_string(),
            "invalid stream state: stream frequency must be positive, got 0 seconds"
        );
    }

    #[test]
    fn arithmetic_error_is_transparent() {
        let err: StreamError = ArithmeticError::DivisionByZero.into();
        assert_eq!(err.to_string(), "division by zero");
    }
}
