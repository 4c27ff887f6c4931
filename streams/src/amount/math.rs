//! Wide multiply-then-divide.
//!
//! The accrual formula is `cap * elapsed / frequency`. With 18-decimal caps
//! the product of two `u128` operands easily exceeds 128 bits, so the
//! product is formed as a 256-bit `(hi, lo)` pair and divided with a
//! shift-subtract long division. Only the final quotient must fit in
//! `u128`.

use thiserror::Error;

/// Failures of [`mul_div`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// `floor(a * b / c)` does not fit in 128 bits.
    #[error("arithmetic overflow: {a} * {b} / {c} exceeds 128 bits")]
    Overflow {
        /// Left multiplicand.
        a: u128,
        /// Right multiplicand.
        b: u128,
        /// Divisor.
        c: u128,
    },

    /// The divisor was zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Computes `floor(a * b / c)` exactly.
///
/// # Errors
///
/// [`ArithmeticError::DivisionByZero`] if `c == 0`, and
/// [`ArithmeticError::Overflow`] if the quotient needs more than 128 bits.
///
/// ```
/// use buidl_streams::amount::mul_div;
///
/// // 500e18 * 15 days / 30 days
/// let cap = 500_000_000_000_000_000_000u128;
/// assert_eq!(mul_div(cap, 1_296_000, 2_592_000), Ok(cap / 2));
/// ```
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, ArithmeticError> {
    if c == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }

    let (hi, lo) = mul_wide(a, b);
    if hi == 0 {
        return Ok(lo / c);
    }
    if hi >= c {
        return Err(ArithmeticError::Overflow { a, b, c });
    }

    // Invariant: rem < c before each step, so (carry, rem) < 2c.
    let mut rem = hi;
    let mut quot: u128 = 0;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        quot <<= 1;
        if carry == 1 || rem >= c {
            rem = rem.wrapping_sub(c);
            quot |= 1;
        }
    }
    Ok(quot)
}

/// Full 256-bit product of two `u128`s as `(high, low)` halves.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;

    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = (ll & MASK) | (mid << 64);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}
