//! Stay intervals and the booking policy that produces them

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Half-open stay interval `[start, end)` in UTC. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl StayPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::Validation(
                "end date must be after start date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Strict overlap: intervals that only touch do not overlap.
    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Check-in/check-out hours and the cancellation cutoff.
///
/// Check-in is later in the day than check-out, so a stay ending on a date
/// and another starting on the same date never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayPolicy {
    pub check_in_hour: u32,
    pub check_out_hour: u32,
    pub cancellation_window: Duration,
}

impl Default for StayPolicy {
    fn default() -> Self {
        Self {
            check_in_hour: 14,
            check_out_hour: 10,
            cancellation_window: Duration::hours(24),
        }
    }
}

impl StayPolicy {
    /// Turn calendar dates into a stay: check-in on `start`, check-out on `end`.
    pub fn normalize(&self, start: NaiveDate, end: NaiveDate) -> DomainResult<StayPeriod> {
        let start = at_hour(start, self.check_in_hour)?;
        let end = at_hour(end, self.check_out_hour)?;
        StayPeriod::new(start, end)
    }

    /// Latest instant at which the tourist may still cancel.
    ///
    /// A window reaching past the earliest representable instant closes
    /// cancellation entirely.
    pub fn cancellation_deadline(&self, period: &StayPeriod) -> DateTime<Utc> {
        period
            .start()
            .checked_sub_signed(self.cancellation_window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> DomainResult<DateTime<Utc>> {
    date.and_hms_opt(hour, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| DomainError::Validation(format!("invalid hour of day: {}", hour)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn normalize_applies_check_in_and_check_out_hours() {
        let period = StayPolicy::default()
            .normalize(date("2025-09-01"), date("2025-09-05"))
            .unwrap();
        assert_eq!(period.start().to_rfc3339(), "2025-09-01T14:00:00+00:00");
        assert_eq!(period.end().to_rfc3339(), "2025-09-05T10:00:00+00:00");
    }

    #[test]
    fn same_day_stay_is_rejected() {
        let err = StayPolicy::default()
            .normalize(date("2025-09-01"), date("2025-09-01"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn reversed_dates_are_rejected() {
        assert!(StayPolicy::default()
            .normalize(date("2025-09-05"), date("2025-09-01"))
            .is_err());
    }

    #[test]
    fn back_to_back_stays_do_not_overlap() {
        let policy = StayPolicy::default();
        let first = policy.normalize(date("2025-09-01"), date("2025-09-05")).unwrap();
        let second = policy.normalize(date("2025-09-05"), date("2025-09-10")).unwrap();
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn touching_instants_do_not_overlap() {
        let a = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 9, 2, 0, 0, 0).unwrap();
        let c = Utc.with_ymd_and_hms(2025, 9, 3, 0, 0, 0).unwrap();
        let left = StayPeriod::new(a, b).unwrap();
        let right = StayPeriod::new(b, c).unwrap();
        assert!(!left.overlaps(&right));
    }

    #[test]
    fn contained_and_partial_stays_overlap() {
        let policy = StayPolicy::default();
        let outer = policy.normalize(date("2025-09-01"), date("2025-09-20")).unwrap();
        let inner = policy.normalize(date("2025-09-05"), date("2025-09-07")).unwrap();
        let tail = policy.normalize(date("2025-09-19"), date("2025-09-25")).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&tail));
    }

    #[test]
    fn cancellation_deadline_is_one_day_before_check_in() {
        let policy = StayPolicy::default();
        let period = policy.normalize(date("2025-09-10"), date("2025-09-12")).unwrap();
        assert_eq!(
            policy.cancellation_deadline(&period).to_rfc3339(),
            "2025-09-09T14:00:00+00:00"
        );
    }

    #[test]
    fn huge_cancellation_window_closes_cancellation() {
        let policy = StayPolicy {
            cancellation_window: Duration::hours(3_000_000_000),
            ..StayPolicy::default()
        };
        let period = policy.normalize(date("2025-09-10"), date("2025-09-12")).unwrap();
        assert_eq!(policy.cancellation_deadline(&period), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn out_of_range_hour_is_a_validation_error() {
        let policy = StayPolicy {
            check_in_hour: 25,
            ..StayPolicy::default()
        };
        assert!(matches!(
            policy.normalize(date("2025-09-01"), date("2025-09-05")),
            Err(DomainError::Validation(_))
        ));
    }
}
