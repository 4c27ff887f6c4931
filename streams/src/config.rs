//! # Stream Accounting Configuration & Constants
//!
//! Every magic number used by the allowance mirror lives here. The precision
//! and display values match what the stream contract and the builder
//! dashboard already agree on; changing them silently changes what builders
//! see next to their withdraw button.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Precision
// ---------------------------------------------------------------------------

/// Fractional digits of the native chain asset. One whole unit is
/// `10^18` smallest units (wei).
pub const NATIVE_DECIMALS: u8 = 18;

/// Largest precision an [`Amount`](crate::amount::Amount) can express.
/// `10^38` is the largest power of ten that fits in a `u128`.
pub const MAX_SUPPORTED_DECIMALS: u8 = 38;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Places shown for balances and available amounts.
pub const BALANCE_DISPLAY_DECIMALS: u8 = 4;

/// Places shown for the stream cap. Caps are round numbers in practice.
pub const CAP_DISPLAY_DECIMALS: u8 = 1;

/// Places shown for the unlock progress percentage.
pub const PROGRESS_DISPLAY_DECIMALS: u8 = 0;

/// Places shown for the replenishment period in days.
pub const PERIOD_DISPLAY_DECIMALS: u8 = 1;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Seconds in one day. Period lengths are reported in days.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// How long a resolved address → name lookup stays fresh. A week keeps the
/// dashboard snappy while still picking up renamed builders eventually.
pub const NAME_CACHE_TTL_SECS: u64 = 7 * SECONDS_PER_DAY;

// ---------------------------------------------------------------------------
// DisplayConfig
// ---------------------------------------------------------------------------

/// Formatting parameters handed to [`StreamSummary::display`].
///
/// [`StreamSummary::display`]: crate::health::StreamSummary::display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Fractional digits of the underlying asset.
    pub decimals: u8,
    /// Places for balance and available amounts.
    pub balance_places: u8,
    /// Places for the cap.
    pub cap_places: u8,
    /// Places for the progress percentage.
    pub progress_places: u8,
    /// Places for the period length in days.
    pub period_places: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: NATIVE_DECIMALS,
            balance_places: BALANCE_DISPLAY_DECIMALS,
            cap_places: CAP_DISPLAY_DECIMALS,
            progress_places: PROGRESS_DISPLAY_DECIMALS,
            period_places: PERIOD_DISPLAY_DECIMALS,
        }
    }
}

impl DisplayConfig {
    /// Default display settings for an asset with `decimals` fractional digits.
    pub fn with_decimals(decimals: u8) -> Self {
        Self {
            decimals,
            ..Self::default()
        }
    }
}
