//! Exact rationals for display-only quantities.
//!
//! Progress through a period and the period length in days are ratios of
//! integers. Keeping them as `numer / denom` means a progress bar and a
//! "30.0 days" label are computed with the same rounding rule as amounts,
//! and two snapshots taken at the same instant compare equal bit-for-bit.

use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use super::units::{increment_decimal, join_decimal};

/// A non-negative rational number `numer / denom` with `denom > 0`.
///
/// Equality and ordering are by value, so `1/2 == 2/4`.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RatioParts")]
pub struct Ratio {
    numer: u64,
    denom: u64,
}

#[derive(Deserialize)]
struct RatioParts {
    numer: u64,
    denom: u64,
}

impl TryFrom<RatioParts> for Ratio {
    type Error = &'static str;

    fn try_from(parts: RatioParts) -> Result<Self, Self::Error> {
        Ratio::new(parts.numer, parts.denom).ok_or("ratio denominator must be positive")
    }
}

impl Ratio {
    pub const ZERO: Ratio = Ratio { numer: 0, denom: 1 };
    pub const ONE: Ratio = Ratio { numer: 1, denom: 1 };

    /// Builds `numer / denom`. Returns `None` when `denom == 0`.
    pub fn new(numer: u64, denom: u64) -> Option<Self> {
        (denom > 0).then_some(Self { numer, denom })
    }

    /// Builds `numer / denom` from a denominator already known to be
    /// positive.
    pub const fn of(numer: u64, denom: NonZeroU64) -> Self {
        Self {
            numer,
            denom: denom.get(),
        }
    }

    /// Builds `min(numer, denom) / denom`, i.e. the ratio clamped to `[0, 1]`.
    pub fn clamped_unit(numer: u64, denom: NonZeroU64) -> Self {
        Self::of(numer.min(denom.get()), denom)
    }

    /// Numerator as stored (not reduced).
    pub fn numer(&self) -> u64 {
        self.numer
    }

    /// Denominator as stored, always positive.
    pub fn denom(&self) -> u64 {
        self.denom
    }

    /// `true` when the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.numer == 0
    }

    /// `true` once the ratio has reached one.
    pub fn is_complete(&self) -> bool {
        self.numer >= self.denom
    }

    /// Value in basis points (1/10 000), floored.
    pub fn basis_points(&self) -> u128 {
        self.numer as u128 * 10_000 / self.denom as u128
    }

    /// Decimal rendering with `places` fractional digits, rounded half away
    /// from zero.
    pub fn to_decimal_string(&self, places: u8) -> String {
        decimal_string(self.numer as u128, self.denom as u128, places)
    }

    /// The ratio as a percentage with `places` fractional digits.
    pub fn percent_string(&self, places: u8) -> String {
        decimal_string(self.numer as u128 * 100, self.denom as u128, places)
    }

    /// Lossy conversion for renderers that want a float (progress bars).
    /// Never feed this back into amount arithmetic.
    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

/// Long division of `numer / denom` producing `places` digits plus one
/// rounding digit.
fn decimal_string(numer: u128, denom: u128, places: u8) -> String {
    let whole = numer / denom;
    let mut rem = numer % denom;

    let mut frac = Vec::with_capacity(places as usize);
    for _ in 0..places {
        rem *= 10;
        frac.push(b'0' + (rem / denom) as u8);
        rem %= denom;
    }

    // Half away from zero: round up when the remainder is at least half.
    if rem * 2 < denom {
        return join_decimal(&whole.to_string(), std::str::from_utf8(&frac).unwrap_or(""));
    }

    let mut digits = whole.to_string().into_bytes();
    digits.extend_from_slice(&frac);
    increment_decimal(&mut digits);
    let (whole, frac) = digits.split_at(digits.len() - places as usize);
    join_decimal(
        std::str::from_utf8(whole).unwrap_or("0"),
        std::str::from_utf8(frac).unwrap_or(""),
    )
}

impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ratio {}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.numer as u128 * other.denom as u128;
        let rhs = other.numer as u128 * self.denom as u128;
        lhs.cmp(&rhs)
    }
}

impl fmt::Debug for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ratio({}/{})", self.numer, self.denom)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_rejected() {
        assert!(Ratio::new(1, 0).is_none());
    }

    #[test]
    fn clamped_unit_saturates_at_one() {
        let thirty = NonZeroU64::new(30).unwrap();
        let r = Ratio::clamped_unit(90, thirty);
        assert_eq!(r, Ratio::ONE);
        assert!(r.is_complete());
        assert_eq!(Ratio::clamped_unit(15, thirty), Ratio::new(1, 2).unwrap());
        assert_eq!(Ratio::of(45, thirty).to_decimal_string(1), "1.5");
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(Ratio::new(1, 2).unwrap(), Ratio::new(2, 4).unwrap());
        assert!(Ratio::new(1, 3).unwrap() < Ratio::new(1, 2).unwrap());
    }

    #[test]
    fn decimal_rendering_rounds_half_up() {
        assert_eq!(Ratio::new(1, 2).unwrap().to_decimal_string(0), "1");
        assert_eq!(Ratio::new(1, 3).unwrap().to_decimal_string(2), "0.33");
        assert_eq!(Ratio::new(2, 3).unwrap().to_decimal_string(2), "0.67");
        assert_eq!(Ratio::new(30, 1).unwrap().to_decimal_string(1), "30.0");
        assert_eq!(Ratio::new(999, 1000).unwrap().to_decimal_string(2), "1.00");
    }

    #[test]
    fn percent_rendering() {
        assert_eq!(Ratio::new(1, 2).unwrap().percent_string(0), "50");
        assert_eq!(Ratio::new(1, 3).unwrap().percent_string(1), "33.3");
        assert_eq!(Ratio::ONE.percent_string(0), "100");
    }

    #[test]
    fn basis_points_floor() {
        assert_eq!(Ratio::new(1, 3).unwrap().basis_points(), 3_333);
        assert_eq!(Ratio::ZERO.basis_points(), 0);
    }

    #[test]
    fn serde_rejects_zero_denominator() {
        let ok: Ratio = serde_json::from_str(r#"{"numer":1,"denom":4}"#).unwrap();
        assert_eq!(ok, Ratio::new(1, 4).unwrap());
        assert!(serde_json::from_str::<Ratio>(r#"{"numer":1,"denom":0}"#).is_err());
    }
}
