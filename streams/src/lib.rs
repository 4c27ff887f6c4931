// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Buidl Streams: Allowance Accounting Mirror
//!
//! Builders are funded through capped streams: each period a stream unlocks
//! up to its cap, linearly, starting from the last withdrawal. The contract
//! is the source of truth; this crate is the off-chain mirror every
//! dashboard widget and eligibility check goes through, so they all agree
//! with the contract and with each other.
//!
//! ## Architecture
//!
//! - **amount**: Smallest-unit integers, decimal parse/format, wide mul_div.
//! - **allowance**: Validated stream state and the accrual calculator.
//! - **health**: Under-funding detection, display payloads, withdraw checks.
//! - **cache**: Injected key-value store with TTL for names and read markers.
//! - **config**: Precision, display places, and cache TTLs.
//! - **error**: Boundary error type.
//!
//! ## Ground Rules
//!
//! 1. Money is an integer. Floats appear only in [`Ratio::to_f64`] for
//!    renderers, and never flow back.
//! 2. `now` is a parameter. Nothing reads the clock.
//! 3. Input is validated once, when a [`StreamState`] is built. After that,
//!    [`evaluate`] and [`summarize`] cannot fail.
//!
//! ```
//! use buidl_streams::{evaluate, summarize, Amount, StreamState, Summary};
//!
//! let cap = Amount::from_whole(500, 18).unwrap();
//! let state = StreamState::new(cap, 2_592_000, 1_700_000_000, cap).unwrap();
//!
//! let result = evaluate(&state, 1_700_000_000 + 1_296_000);
//! assert_eq!(result.unlocked_amount, Amount::from_whole(250, 18).unwrap());
//!
//! match summarize(&state, &result) {
//!     Summary::Active(summary) => assert!(!summary.underfunded),
//!     Summary::NoStream => unreachable!(),
//! }
//! ```

pub mod allowance;
pub mod amount;
pub mod cache;
pub mod config;
pub mod error;
pub mod health;

pub use allowance::{evaluate, AllowanceResult, InvalidStreamState, StreamSnapshot, StreamState};
pub use amount::{format_amount, mul_div, parse_amount, Amount, ArithmeticError, ParseError, Ratio};
pub use config::DisplayConfig;
pub use error::{StreamError, StreamResult};
pub use health::{summarize, summarize_at, StreamDisplay, StreamSummary, Summary, WithdrawalError};

/// Library version, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
