//! Hotel subscriptions and plan limits.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active"    => Ok(Self::Active),
            "expired"   => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            other       => Err(DomainError::UnknownVariant {
                kind: "subscription status",
                value: other.to_string(),
            }),
        }
    }
}

/// Last day covered by a subscription of `months` starting on `start`.
///
/// Calendar months; a start on the 31st ends on the last day of the target
/// month.
///
/// # Errors
/// [`DomainError::InvalidPeriod`] for zero months or a date overflow.
pub fn end_date(start: NaiveDate, months: u32) -> Result<NaiveDate, DomainError> {
    if months == 0 {
        return Err(DomainError::InvalidPeriod(
            "subscription must last at least one month".into(),
        ));
    }
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| DomainError::InvalidPeriod("subscription end is out of range".into()))
}

/// Whether a subscription row grants access on `day`.
pub fn is_effective(
    status: SubscriptionStatus,
    start: NaiveDate,
    end: NaiveDate,
    day: NaiveDate,
) -> bool {
    status == SubscriptionStatus::Active && start <= day && day <= end
}

/// Refuse to create one more `what` once `current` reaches `max`.
///
/// # Errors
/// [`DomainError::PlanLimitReached`] when the plan is full.
pub fn ensure_capacity(current: i64, max: i64, what: &str) -> Result<(), DomainError> {
    if current >= max {
        return Err(DomainError::PlanLimitReached(format!(
            "plan allows at most {max} {what}"
        )));
    }
    Ok(())
}
