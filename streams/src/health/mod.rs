//! # Health Module: Funding Health Evaluator
//!
//! Compares what a stream has unlocked with what it actually holds and
//! packages the result for presentation.
//!
//! ```text
//! summary.rs   : summarize(), the NoStream sentinel, display strings
//! withdrawal.rs: eligibility check for a requested withdrawal
//! ```
//!
//! Every comparison is between integers in the same smallest unit. A
//! truncated display string is never compared against anything.

pub mod summary;
pub mod withdrawal;

pub use summary::{summarize, summarize_at, StreamDisplay, StreamSummary, Summary};
pub use withdrawal::WithdrawalError;
