//! # Amount Module: Fixed-Unit Arithmetic
//!
//! All money in the stream mirror is an integer count of the asset's
//! smallest unit. Nothing in this module touches binary floating point:
//! parsing, formatting, and the accrual multiplication are exact.
//!
//! ```text
//! units.rs: Amount newtype, decimal parsing and display formatting
//! math.rs : mul_div with a 256-bit intermediate product
//! ratio.rs: exact rationals for progress and period display
//! ```
//!
//! There is exactly one rounding rule, applied once at formatting time:
//! round half away from zero at the cut digit. Since amounts are never
//! negative this is the familiar "half up" currency rounding.

pub mod math;
pub mod ratio;
pub mod units;

pub use math::{mul_div, ArithmeticError};
pub use ratio::Ratio;
pub use units::{format_amount, parse_amount, Amount, ParseError};
