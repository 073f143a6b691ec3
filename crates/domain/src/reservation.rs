//! Reservation rules: stay periods, overlap, pricing and the status machine.
//!
//! Status flow:
//!
//! ```text
//! pending ──► confirmed ──► checked_in ──► checked_out
//!    │            │
//!    └────────────┴──► cancelled
//! ```
//!
//! `checked_out` and `cancelled` are terminal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DomainError, RoomStatus};

/// Longest stay a single reservation may cover.
pub const MAX_NIGHTS: i64 = 365;

// ---------------------------------------------------------------------------
// StayPeriod
// ---------------------------------------------------------------------------

/// Half-open date range `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPeriod {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayPeriod {
    /// # Errors
    /// [`DomainError::InvalidPeriod`] unless `check_in < check_out` and the
    /// stay is at most [`MAX_NIGHTS`] long.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, DomainError> {
        if check_out <= check_in {
            return Err(DomainError::InvalidPeriod(
                "check-out must be after check-in".into(),
            ));
        }
        let period = Self { check_in, check_out };
        if period.nights() > MAX_NIGHTS {
            return Err(DomainError::InvalidPeriod(format!(
                "stay cannot exceed {MAX_NIGHTS} nights"
            )));
        }
        Ok(period)
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Back-to-back stays (one checks out the day the other checks in) do
    /// not overlap.
    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Price of the stay at `nightly_price`, rounded to cents.
    pub fn quote(&self, nightly_price: Decimal) -> Decimal {
        (nightly_price * Decimal::from(self.nights())).round_dp(2)
    }
}

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    /// Statuses that hold the room for their dates.
    pub const BLOCKING: [ReservationStatus; 3] = [Self::Pending, Self::Confirmed, Self::CheckedIn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }

    pub fn is_blocking(&self) -> bool {
        Self::BLOCKING.contains(self)
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, CheckedIn)
                | (CheckedIn, CheckedOut)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    /// Validate a move and return the room status it implies, if any.
    ///
    /// `room` is the current status of the reserved room; a check-in needs
    /// the room to be available or waiting for cleaning.
    ///
    /// # Errors
    /// [`DomainError::InvalidTransition`] for moves outside the status flow,
    /// [`DomainError::RoomUnavailable`] for a check-in into a blocked room.
    pub fn transition(
        &self,
        next: ReservationStatus,
        room: RoomStatus,
    ) -> Result<Option<RoomStatus>, DomainError> {
        if !self.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        match next {
            Self::CheckedIn => match room {
                RoomStatus::Available | RoomStatus::Cleaning => Ok(Some(RoomStatus::Occupied)),
                RoomStatus::Maintenance => Err(DomainError::RoomUnavailable(
                    "room is under maintenance".into(),
                )),
                RoomStatus::Occupied => Err(DomainError::RoomUnavailable(
                    "room is still occupied".into(),
                )),
            },
            Self::CheckedOut => Ok(Some(RoomStatus::Cleaning)),
            _ => Ok(None),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending"     => Ok(Self::Pending),
            "confirmed"   => Ok(Self::Confirmed),
            "checked_in"  => Ok(Self::CheckedIn),
            "checked_out" => Ok(Self::CheckedOut),
            "cancelled"   => Ok(Self::Cancelled),
            other         => Err(DomainError::UnknownVariant {
                kind: "reservation status",
                value: other.to_string(),
            }),
        }
    }
}

/// A client may cancel their own booking only while it is still cancellable
/// and strictly before the check-in date.
///
/// # Errors
/// [`DomainError::InvalidTransition`] when the booking can no longer be
/// cancelled.
pub fn ensure_client_can_cancel(
    status: ReservationStatus,
    check_in: NaiveDate,
    today: NaiveDate,
) -> Result<(), DomainError> {
    if !status.can_transition_to(ReservationStatus::Cancelled) {
        return Err(DomainError::InvalidTransition {
            from: status.to_string(),
            to: ReservationStatus::Cancelled.to_string(),
        });
    }
    if check_in <= today {
        return Err(DomainError::InvalidPeriod(
            "cannot cancel on or after the check-in date".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stay(a: &str, b: &str) -> StayPeriod {
        StayPeriod::new(d(a), d(b)).unwrap()
    }

    #[test]
    fn period_requires_check_out_after_check_in() {
        assert!(StayPeriod::new(d("2026-05-02"), d("2026-05-02")).is_err());
        assert!(StayPeriod::new(d("2026-05-03"), d("2026-05-02")).is_err());
        assert_eq!(stay("2026-05-01", "2026-05-04").nights(), 3);
    }

    #[test]
    fn overly_long_stay_is_rejected() {
        assert!(StayPeriod::new(d("2026-01-01"), d("2027-01-02")).is_err());
        assert!(StayPeriod::new(d("2026-01-01"), d("2027-01-01")).is_ok());
    }

    #[test]
    fn overlap_is_half_open() {
        let a = stay("2026-05-01", "2026-05-05");
        assert!(a.overlaps(&stay("2026-05-04", "2026-05-06")));
        assert!(a.overlaps(&stay("2026-04-28", "2026-05-02")));
        assert!(a.overlaps(&stay("2026-05-02", "2026-05-03")));
        assert!(!a.overlaps(&stay("2026-05-05", "2026-05-07")));
        assert!(!a.overlaps(&stay("2026-04-25", "2026-05-01")));
    }

    #[test]
    fn quote_multiplies_nights() {
        let price = Decimal::from_str("89.90").unwrap();
        assert_eq!(stay("2026-05-01", "2026-05-04").quote(price).to_string(), "269.70");
    }

    #[test]
    fn status_flow_is_linear() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(CheckedIn));
        assert!(CheckedIn.can_transition_to(CheckedOut));
        assert!(!Pending.can_transition_to(CheckedIn));
        assert!(!CheckedIn.can_transition_to(Cancelled));
        assert!(!CheckedOut.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn check_in_and_out_drive_room_status() {
        use ReservationStatus::*;
        assert_eq!(
            Confirmed.transition(CheckedIn, RoomStatus::Available).unwrap(),
            Some(RoomStatus::Occupied)
        );
        assert_eq!(
            CheckedIn.transition(CheckedOut, RoomStatus::Occupied).unwrap(),
            Some(RoomStatus::Cleaning)
        );
        assert_eq!(Pending.transition(Confirmed, RoomStatus::Available).unwrap(), None);
    }

    #[test]
    fn check_in_refused_under_maintenance() {
        let err = ReservationStatus::Confirmed
            .transition(ReservationStatus::CheckedIn, RoomStatus::Maintenance)
            .unwrap_err();
        assert!(matches!(err, DomainError::RoomUnavailable(_)));
    }

    #[test]
    fn check_in_needs_a_free_room() {
        use ReservationStatus::*;
        let err = Confirmed.transition(CheckedIn, RoomStatus::Occupied).unwrap_err();
        assert_eq!(err, DomainError::RoomUnavailable("room is still occupied".into()));
        assert_eq!(
            Confirmed.transition(CheckedIn, RoomStatus::Cleaning).unwrap(),
            Some(RoomStatus::Occupied)
        );
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = ReservationStatus::Pending
            .transition(ReservationStatus::CheckedOut, RoomStatus::Available)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot change reservation status from 'pending' to 'checked_out'"
        );
    }

    #[test]
    fn client_cancellation_window() {
        let today = d("2026-05-01");
        assert!(ensure_client_can_cancel(ReservationStatus::Confirmed, d("2026-05-02"), today).is_ok());
        assert!(ensure_client_can_cancel(ReservationStatus::Confirmed, today, today).is_err());
        assert!(ensure_client_can_cancel(ReservationStatus::CheckedIn, d("2026-05-09"), today).is_err());
    }

    #[test]
    fn blocking_statuses() {
        assert!(ReservationStatus::Pending.is_blocking());
        assert!(ReservationStatus::CheckedIn.is_blocking());
        assert!(!ReservationStatus::Cancelled.is_blocking());
        assert!(!ReservationStatus::CheckedOut.is_blocking());
        assert!(ReservationStatus::from_str("checked_in").unwrap().is_blocking());
    }
}
