//! Weekly staff planning: week boundaries and shift overlap.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Monday and Sunday of the ISO week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// Whole weeks between the weeks containing `from` and `to`.
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let (a, _) = week_bounds(from);
    let (b, _) = week_bounds(to);
    (b - a).num_days() / 7
}

/// Working hours within a single day, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Shift {
    /// # Errors
    /// [`DomainError::InvalidShift`] unless `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidShift(
                "end time must be after start time".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &Shift) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn hours(&self) -> f64 {
        (self.end - self.start).num_minutes() as f64 / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2026-10-14 is a Wednesday.
        assert_eq!(week_bounds(d("2026-10-14")), (d("2026-10-12"), d("2026-10-18")));
        assert_eq!(week_bounds(d("2026-10-12")), (d("2026-10-12"), d("2026-10-18")));
        assert_eq!(week_bounds(d("2026-10-18")), (d("2026-10-12"), d("2026-10-18")));
    }

    #[test]
    fn week_offsets() {
        assert_eq!(weeks_between(d("2026-10-14"), d("2026-10-21")), 1);
        assert_eq!(weeks_between(d("2026-10-18"), d("2026-10-19")), 1);
        assert_eq!(weeks_between(d("2026-10-19"), d("2026-10-05")), -2);
    }

    #[test]
    fn shift_must_end_after_start() {
        assert!(Shift::new(t("09:00"), t("09:00")).is_err());
        assert!(Shift::new(t("17:00"), t("09:00")).is_err());
        assert_eq!(Shift::new(t("09:00"), t("17:30")).unwrap().hours(), 8.5);
    }

    #[test]
    fn adjacent_shifts_do_not_overlap() {
        let morning = Shift::new(t("06:00"), t("14:00")).unwrap();
        let evening = Shift::new(t("14:00"), t("22:00")).unwrap();
        let split = Shift::new(t("12:00"), t("16:00")).unwrap();
        assert!(!morning.overlaps(&evening));
        assert!(morning.overlaps(&split));
        assert!(evening.overlaps(&split));
    }
}
