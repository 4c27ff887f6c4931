//! # Allowance Module: Stream Accrual Calculator
//!
//! Mirrors the stream contract's unlock schedule off-chain so dashboards and
//! eligibility checks agree with what a withdrawal would actually allow.
//!
//! ```text
//! state.rs     : StreamSnapshot (raw reader output) and validated StreamState
//! calculator.rs: evaluate(): elapsed time, unlocked amount, progress
//! ```
//!
//! `now` is always an argument. Nothing in here reads the clock.

pub mod calculator;
pub mod state;

pub use calculator::{evaluate, AllowanceResult};
pub use state::{InvalidStreamState, StreamSnapshot, StreamState};
