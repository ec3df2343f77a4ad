//! Exact decimal helpers for monetary amounts and percentages.
//!
//! Amounts are stored as integer minor units (cents) so that sums computed by
//! the database are exact. Everything above the store works with [Decimal].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::Error;

/// The number of decimal places used for monetary amounts.
pub(crate) const CURRENCY_SCALE: u32 = 2;

/// The number of decimal places a ratio is rounded to before it is scaled to a percentage.
const RATIO_SCALE: u32 = 4;

/// The largest amount that can be stored, in minor units: thirteen integer
/// digits and two decimal places.
pub(crate) const MAX_AMOUNT_MINOR_UNITS: i64 = 999_999_999_999_999;

/// Convert a positive amount to integer minor units, e.g. `12.34` to `1234`.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `amount` is zero, negative, has more than
/// two decimal places, or is larger than [MAX_AMOUNT_MINOR_UNITS] cents.
pub(crate) fn to_minor_units(amount: Decimal) -> Result<i64, Error> {
    let normalized = amount.normalize();

    if normalized <= Decimal::ZERO || normalized.scale() > CURRENCY_SCALE {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    let mut rescaled = normalized;
    rescaled.rescale(CURRENCY_SCALE);

    i64::try_from(rescaled.mantissa())
        .ok()
        .filter(|minor_units| *minor_units <= MAX_AMOUNT_MINOR_UNITS)
        .ok_or_else(|| Error::InvalidAmount(amount.to_string()))
}

/// Convert integer minor units back into an amount with two decimal places.
pub(crate) fn from_minor_units(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, CURRENCY_SCALE)
}

/// Convert a sum of minor units back into an amount with two decimal places.
///
/// Sums are accumulated in 128 bits so that adding up stored amounts never
/// overflows.
///
/// # Errors
/// Returns [Error::TotalOverflow] if the sum does not fit in a [Decimal].
pub(crate) fn from_minor_units_total(total: i128) -> Result<Decimal, Error> {
    Decimal::try_from_i128_with_scale(total, CURRENCY_SCALE).map_err(|_| Error::TotalOverflow)
}

/// Express `part` as a percentage of `whole`.
///
/// The ratio is rounded half-up to four decimal places *before* it is scaled
/// by 100, so the result has at most two decimal places. Trailing zeros are
/// removed, e.g. `800 / 1000` gives `80`, not `80.0000`.
///
/// A zero `whole` yields zero rather than an error.
pub(crate) fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }

    let ratio = (part / whole)
        .round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero);

    (ratio * Decimal::ONE_HUNDRED).normalize()
}
