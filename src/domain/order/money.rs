//! Conversion between the provider's minor units and store amounts.
//!
//! The provider reports amounts in minor units (kobo, cents). The store keeps
//! totals as decimals in major units. Conversions here are exact: there is no
//! floating point anywhere on the settlement path.

use rust_decimal::Decimal;

use crate::domain::foundation::ValidationError;

/// Number of minor units per major unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

const MINOR_UNIT_SCALE: u32 = 2;

/// Converts a minor-unit integer into a major-unit decimal.
///
/// `450000` becomes `4500.00`.
pub fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

/// Converts a major-unit decimal into minor units.
///
/// Fails when the amount carries sub-minor precision (e.g. `10.005`) or does
/// not fit into an `i64`.
pub fn major_to_minor(major: Decimal) -> Result<i64, ValidationError> {
    let scaled = major
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .ok_or_else(|| ValidationError::invalid_format("amount", "amount overflows"))?;

    if scaled.fract() != Decimal::ZERO {
        return Err(ValidationError::invalid_format(
            "amount",
            format!("{} has more precision than the minor unit", major),
        ));
    }

    i64::try_from(scaled.trunc())
        .map_err(|_| ValidationError::invalid_format("amount", "amount overflows"))
}
