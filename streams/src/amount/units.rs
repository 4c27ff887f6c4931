//! # Smallest-Unit Amounts
//!
//! [`Amount`] wraps a `u128` count of smallest units (wei for the native
//! asset). Human-facing decimal strings are converted at the edges with
//! [`parse_amount`] and [`format_amount`]; everything in between is integer
//! arithmetic.
//!
//! Formatting works on the decimal digit string rather than on the integer,
//! so it never overflows, whatever precision the caller asks for.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::MAX_SUPPORTED_DECIMALS;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced when turning a decimal string into an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was empty or whitespace only.
    #[error("empty amount string")]
    Empty,

    /// The input carried a leading minus sign.
    #[error("negative amounts are not permitted")]
    Negative,

    /// A character other than an ASCII digit or a single decimal point.
    #[error("invalid character {found:?} at position {position}")]
    InvalidDigit {
        /// Byte offset of the offending character in the trimmed input.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// Structurally wrong decimal: missing digits around the point, or
    /// more than one point.
    #[error("malformed decimal: {0}")]
    MalformedDecimal(&'static str),

    /// More fractional digits than the asset's precision.
    #[error("too many fractional digits: found {found}, precision is {max}")]
    ExcessPrecision {
        /// Fractional digits present in the input.
        found: usize,
        /// Fractional digits the asset supports.
        max: u8,
    },

    /// The value does not fit in 128 bits of smallest units.
    #[error("amount out of range for 128-bit smallest units")]
    OutOfRange,

    /// The requested precision cannot be represented.
    #[error("unsupported precision: {decimals} decimals (maximum {max})")]
    UnsupportedPrecision {
        /// The precision that was asked for.
        decimals: u8,
        /// The largest supported precision.
        max: u8,
    },
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A non-negative amount in the smallest indivisible unit of the asset.
///
/// Serialized as a base-10 string of smallest units (`"1500000000000000000"`)
/// because JSON numbers are doubles for most consumers and 18-decimal
/// amounts do not survive that trip.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    /// Zero smallest units.
    pub const ZERO: Amount = Amount(0);

    /// Wraps a raw smallest-unit count.
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Returns the raw smallest-unit count.
    pub const fn units(&self) -> u128 {
        self.0
    }

    /// Returns `true` if this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `whole * 10^decimals`, or `None` on overflow.
    ///
    /// Convenient for constants and tests: `Amount::from_whole(500, 18)`.
    pub fn from_whole(whole: u128, decimals: u8) -> Option<Self> {
        let scale = pow10(decimals).ok()?;
        whole.checked_mul(scale).map(Self)
    }

    /// Parses a human decimal string at the given precision.
    pub fn parse(input: &str, decimals: u8) -> Result<Self, ParseError> {
        parse_amount(input, decimals)
    }

    /// Formats this amount with `places` fractional digits.
    pub fn to_decimal_string(&self, decimals: u8, places: u8) -> String {
        format_amount(*self, decimals, places)
    }

    /// Checked addition. Returns `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction. Returns `None` if `rhs` is larger.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Subtraction floored at zero.
    pub fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units as u128)
    }
}

impl FromStr for Amount {
    type Err = ParseError;

    /// Parses a raw smallest-unit count (no decimal point).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        if s.starts_with('-') {
            return Err(ParseError::Negative);
        }
        accumulate_digits(s, 0).map(Self)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a smallest-unit amount as a string or unsigned integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                u64::try_from(v)
                    .map(Amount::from)
                    .map_err(|_| E::custom(ParseError::Negative))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses a decimal string such as `"12.5"` into smallest units at
/// `decimals` precision.
///
/// Accepted forms are `digits` and `digits.digits`; surrounding ASCII
/// whitespace is ignored. Signs, exponents, separators, and bare `.5` / `5.`
/// forms are rejected rather than guessed at.
///
/// # Errors
///
/// See [`ParseError`]. Malformed input is never coerced to zero.
pub fn parse_amount(input: &str, decimals: u8) -> Result<Amount, ParseError> {
    let scale = pow10(decimals)?;
    let s = input.trim();

    if s.is_empty() {
        return Err(ParseError::Empty);
    }
    if s.starts_with('-') {
        return Err(ParseError::Negative);
    }
    if let Some((position, found)) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
    {
        return Err(ParseError::InvalidDigit { position, found });
    }

    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };
    if whole.is_empty() {
        return Err(ParseError::MalformedDecimal("missing integer digits"));
    }
    if s.contains('.') && frac.is_empty() {
        return Err(ParseError::MalformedDecimal("missing fractional digits"));
    }
    if frac.contains('.') {
        return Err(ParseError::MalformedDecimal("more than one decimal point"));
    }
    if frac.len() > decimals as usize {
        return Err(ParseError::ExcessPrecision {
            found: frac.len(),
            max: decimals,
        });
    }

    let whole_units = accumulate_digits(whole, 0)?
        .checked_mul(scale)
        .ok_or(ParseError::OutOfRange)?;

    let frac_units = if frac.is_empty() {
        0
    } else {
        let pad = pow10(decimals - frac.len() as u8)?;
        accumulate_digits(frac, whole.len() + 1)?
            .checked_mul(pad)
            .ok_or(ParseError::OutOfRange)?
    };

    whole_units
        .checked_add(frac_units)
        .map(Amount)
        .ok_or(ParseError::OutOfRange)
}

/// Folds an ASCII digit string into a `u128`. `offset` is only used to
/// report positions relative to the caller's full input.
fn accumulate_digits(digits: &str, offset: usize) -> Result<u128, ParseError> {
    digits.char_indices().try_fold(0u128, |acc, (i, c)| {
        let digit = c.to_digit(10).ok_or(ParseError::InvalidDigit {
            position: offset + i,
            found: c,
        })?;
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(digit as u128))
            .ok_or(ParseError::OutOfRange)
    })
}

/// `10^decimals` as a `u128`.
pub(crate) fn pow10(decimals: u8) -> Result<u128, ParseError> {
    if decimals > MAX_SUPPORTED_DECIMALS {
        return Err(ParseError::UnsupportedPrecision {
            decimals,
            max: MAX_SUPPORTED_DECIMALS,
        });
    }
    Ok(10u128.pow(decimals as u32))
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Formats `amount` (at `decimals` precision) with exactly `places`
/// fractional digits.
///
/// Digits beyond `places` are rounded half away from zero: the kept value
/// goes up by one in the last place when the first dropped digit is 5 or
/// more. When `places >= decimals` the value is exact and zero-padded.
/// `places == 0` produces no decimal point.
///
/// ```
/// use buidl_streams::amount::{format_amount, Amount};
///
/// let a = Amount::from_units(1_234_550_000_000_000_000);
/// assert_eq!(format_amount(a, 18, 4), "1.2346");
/// assert_eq!(format_amount(a, 18, 1), "1.2");
/// ```
pub fn format_amount(amount: Amount, decimals: u8, places: u8) -> String {
    let decimals = decimals as usize;
    let places = places as usize;

    let raw = amount.0.to_string();
    let padded = if raw.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - raw.len()), raw)
    } else {
        raw
    };
    let (whole, frac) = padded.split_at(padded.len() - decimals);

    if places >= decimals {
        return join_decimal(whole, &format!("{:0<width$}", frac, width = places));
    }

    let (kept, dropped) = frac.split_at(places);
    let round_up = dropped.as_bytes().first().is_some_and(|d| *d >= b'5');

    if !round_up {
        return join_decimal(whole, kept);
    }

    let mut digits = format!("{}{}", whole, kept).into_bytes();
    increment_decimal(&mut digits);
    let split = digits.len() - places;
    let (whole, kept) = digits.split_at(split);
    join_decimal(
        std::str::from_utf8(whole).unwrap_or("0"),
        std::str::from_utf8(kept).unwrap_or(""),
    )
}

/// Adds one to an ASCII decimal digit string in place, growing it by one
/// leading digit when the carry runs off the front.
pub(crate) fn increment_decimal(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

pub(crate) fn join_decimal(whole: &str, frac: &str) -> String {
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
