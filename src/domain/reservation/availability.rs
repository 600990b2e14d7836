//! Availability checking
//!
//! Pure functions over a cottage's existing reservations. Only
//! `unresolved` and `approved` reservations occupy the calendar.

use super::model::Reservation;
use super::period::StayPeriod;

/// First blocking reservation whose stay overlaps `candidate`.
///
/// `exclude` skips one reservation id, so a reservation never conflicts with itself.
pub fn find_conflict<'a, I>(
    existing: I,
    candidate: &StayPeriod,
    exclude: Option<&str>,
) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    existing
        .into_iter()
        .filter(|r| r.status.blocks_availability())
        .filter(|r| exclude != Some(r.id.as_str()))
        .find(|r| r.period.overlaps(candidate))
}

pub fn has_conflict<'a, I>(existing: I, candidate: &StayPeriod, exclude: Option<&str>) -> bool
where
    I: IntoIterator<Item = &'a Reservation>,
{
    find_conflict(existing, candidate, exclude).is_some()
}
