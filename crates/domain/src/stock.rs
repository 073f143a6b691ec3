//! Stock movement arithmetic.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received; quantity must be positive.
    In,
    /// Goods consumed; quantity must be positive.
    Out,
    /// Inventory correction; quantity is a signed, non-zero delta.
    Adjustment,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Adjustment => "adjustment",
        }
    }

    /// Signed change this movement applies to the stock quantity.
    ///
    /// # Errors
    /// [`DomainError::InvalidQuantity`] for a non-positive `in`/`out`
    /// quantity, a zero adjustment or one that cannot be negated.
    pub fn delta(&self, quantity: i64) -> Result<i64, DomainError> {
        match self {
            Self::In | Self::Out if quantity <= 0 => Err(DomainError::InvalidQuantity(format!(
                "'{self}' quantity must be positive"
            ))),
            Self::In => Ok(quantity),
            Self::Out => Ok(-quantity),
            Self::Adjustment if quantity == 0 => Err(DomainError::InvalidQuantity(
                "adjustment cannot be zero".into(),
            )),
            Self::Adjustment if quantity == i64::MIN => Err(DomainError::InvalidQuantity(
                "adjustment is out of range".into(),
            )),
            Self::Adjustment => Ok(quantity),
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in"         => Ok(Self::In),
            "out"        => Ok(Self::Out),
            "adjustment" => Ok(Self::Adjustment),
            other        => Err(DomainError::UnknownVariant {
                kind: "movement kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Quantity after applying `delta` to `current`.
///
/// # Errors
/// [`DomainError::InsufficientStock`] if the result would be negative.
pub fn apply_delta(current: i64, delta: i64) -> Result<i64, DomainError> {
    let next = current.checked_add(delta).ok_or_else(|| {
        DomainError::InvalidQuantity("quantity overflow".into())
    })?;
    if next < 0 {
        return Err(DomainError::InsufficientStock {
            available: current,
            requested: delta.saturating_neg(),
        });
    }
    Ok(next)
}

/// A stock is low once it reaches its alert threshold.
pub fn is_low(quantity: i64, alert_threshold: i64) -> bool {
    quantity <= alert_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_follow_direction() {
        assert_eq!(MovementKind::In.delta(5).unwrap(), 5);
        assert_eq!(MovementKind::Out.delta(5).unwrap(), -5);
        assert_eq!(MovementKind::Adjustment.delta(-3).unwrap(), -3);
    }

    #[test]
    fn bad_quantities_are_rejected() {
        assert!(MovementKind::In.delta(0).is_err());
        assert!(MovementKind::Out.delta(-2).is_err());
        assert!(MovementKind::Adjustment.delta(0).is_err());
    }

    #[test]
    fn quantity_never_goes_negative() {
        assert_eq!(apply_delta(10, -10).unwrap(), 0);
        assert_eq!(
            apply_delta(3, -4).unwrap_err(),
            DomainError::InsufficientStock { available: 3, requested: 4 }
        );
    }

    #[test]
    fn extreme_adjustments_do_not_overflow() {
        assert!(MovementKind::Adjustment.delta(i64::MIN).is_err());
        assert_eq!(
            apply_delta(0, i64::MIN).unwrap_err(),
            DomainError::InsufficientStock { available: 0, requested: i64::MAX }
        );
        assert!(apply_delta(i64::MAX, 1).is_err());
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_low(5, 5));
        assert!(!is_low(6, 5));
    }
}
