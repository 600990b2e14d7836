//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Reservation, ReservationStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert `reservation` unless a blocking reservation of the same cottage
    /// overlaps its stay. The check and the insert are atomic; an overlap
    /// fails with `DomainError::Conflict` and writes nothing.
    async fn insert_if_available(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// `unresolved` and `approved` reservations of a cottage
    async fn find_blocking_for_cottage(&self, cottage_id: &str) -> DomainResult<Vec<Reservation>>;

    /// A tourist's reservations, latest stay first
    async fn find_for_tourist(&self, tourist_id: &str) -> DomainResult<Vec<Reservation>>;

    /// Reservations of the given cottages, newest request first
    async fn find_for_cottages(
        &self,
        cottage_ids: &[String],
        status: Option<ReservationStatus>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Store `reservation.status` and `reservation.deny_comment` if the stored
    /// status still equals `expected`. Returns `false` when it does not.
    async fn update_status(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> DomainResult<bool>;

    /// Set `is_reviewed`; never cleared
    async fn mark_reviewed(&self, id: &str) -> DomainResult<()>;

    /// Number of reservations created at or after `since`
    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64>;
}
