//! Conversions between wire amounts (`Decimal`) and stored amounts (cents).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::DomainError;

/// Turn a stored amount in cents into a two-decimal `Decimal`.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Turn a submitted amount into cents, rounding half away from zero.
///
/// # Errors
/// [`DomainError::InvalidAmount`] for negative or out-of-range amounts.
pub fn decimal_to_cents(amount: Decimal) -> Result<i64, DomainError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::InvalidAmount(format!("{amount} is negative")));
    }
    let out_of_range = || DomainError::InvalidAmount(format!("{amount} is out of range"));
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(out_of_range)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(out_of_range)
}
