//! Reservation use cases
//!
//! Every operation takes the authenticated [`Caller`] explicitly and
//! enforces the role and ownership guards before touching the store.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use super::locks::CottageLocks;
use crate::domain::reservation::has_conflict;
use crate::domain::{
    Caller, DomainError, DomainResult, RepositoryProvider, Reservation, ReservationAction,
    ReservationStatus, Role, StayPolicy,
};
use crate::shared::Clock;

/// Which of a tourist's reservations to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservationScope {
    /// Upcoming or ongoing, still unresolved or approved
    Current,
    /// Finished stays plus denied and canceled requests
    Archive,
    #[default]
    All,
}

impl ReservationScope {
    fn includes(self, reservation: &Reservation, now: DateTime<Utc>) -> bool {
        match self {
            Self::Current => !reservation.is_archived(now),
            Self::Archive => reservation.is_archived(now),
            Self::All => true,
        }
    }
}

impl fmt::Display for ReservationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "current",
            Self::Archive => "archive",
            Self::All => "all",
        })
    }
}

impl FromStr for ReservationScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "archive" => Ok(Self::Archive),
            "all" => Ok(Self::All),
            other => Err(DomainError::Validation(format!(
                "unknown scope '{}', expected current, archive or all",
                other
            ))),
        }
    }
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    policy: StayPolicy,
    clock: Arc<dyn Clock>,
    locks: CottageLocks,
}

impl ReservationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        policy: StayPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            policy,
            clock,
            locks: CottageLocks::new(),
        }
    }

    pub fn policy(&self) -> &StayPolicy {
        &self.policy
    }

    /// Whether the stay `[start, end)` overlaps a blocking reservation of the cottage.
    pub async fn has_conflict(
        &self,
        cottage_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation_id: Option<&str>,
    ) -> DomainResult<bool> {
        let period = self.policy.normalize(start, end)?;
        self.ensure_cottage(cottage_id).await?;
        let existing = self
            .repos
            .reservations()
            .find_blocking_for_cottage(cottage_id)
            .await?;
        Ok(has_conflict(&existing, &period, exclude_reservation_id))
    }

    pub async fn create_reservation(
        &self,
        caller: &Caller,
        cottage_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Reservation> {
        caller.require_role(Role::Tourist, "create a reservation")?;
        let period = self.policy.normalize(start, end)?;
        self.ensure_cottage(cottage_id).await?;

        let _guard = self.locks.acquire(cottage_id).await;
        let reservation = Reservation::new(&caller.id, cottage_id, period, self.clock.now());

        match self.repos.reservations().insert_if_available(reservation).await {
            Ok(created) => {
                metrics::counter!("reservations_created_total").increment(1);
                info!(
                    reservation_id = %created.id,
                    cottage_id = %created.cottage_id,
                    tourist_id = %created.tourist_id,
                    "Reservation created"
                );
                Ok(created)
            }
            Err(e @ DomainError::Conflict(_)) => {
                metrics::counter!("reservation_conflicts_total").increment(1);
                warn!(cottage_id = %cottage_id, tourist_id = %caller.id, "Reservation rejected: {}", e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn approve(&self, caller: &Caller, reservation_id: &str) -> DomainResult<Reservation> {
        let reservation = self.load(reservation_id).await?;
        self.require_cottage_owner(caller, &reservation, "approve reservations")
            .await?;
        self.commit_transition(reservation, ReservationAction::Approve, |r| r.approve())
            .await
    }

    pub async fn deny(
        &self,
        caller: &Caller,
        reservation_id: &str,
        comment: &str,
    ) -> DomainResult<Reservation> {
        let reservation = self.load(reservation_id).await?;
        self.require_cottage_owner(caller, &reservation, "deny reservations")
            .await?;
        self.commit_transition(reservation, ReservationAction::Deny, |r| r.deny(comment))
            .await
    }

    pub async fn cancel(&self, caller: &Caller, reservation_id: &str) -> DomainResult<Reservation> {
        let reservation = self.load(reservation_id).await?;
        require_own(caller, &reservation, "cancel")?;
        let now = self.clock.now();
        self.commit_transition(reservation, ReservationAction::Cancel, |r| {
            r.cancel(now, &self.policy)
        })
        .await
    }

    /// Called once the tourist has reviewed the stay. Repeating it is a no-op.
    pub async fn mark_reviewed(
        &self,
        caller: &Caller,
        reservation_id: &str,
    ) -> DomainResult<Reservation> {
        let mut reservation = self.load(reservation_id).await?;
        require_own(caller, &reservation, "mark as reviewed")?;

        if reservation.mark_reviewed(self.clock.now())? {
            self.repos.reservations().mark_reviewed(&reservation.id).await?;
            info!(reservation_id = %reservation.id, "Reservation marked as reviewed");
        }
        Ok(reservation)
    }

    /// Visible to its tourist, the cottage owner and administrators.
    pub async fn get(&self, caller: &Caller, reservation_id: &str) -> DomainResult<Reservation> {
        let reservation = self.load(reservation_id).await?;
        if caller.role == Role::Administrator || caller.id == reservation.tourist_id {
            return Ok(reservation);
        }
        let owner_id = self.repos.cottages().get_owner(&reservation.cottage_id).await?;
        if caller.id == owner_id {
            Ok(reservation)
        } else {
            Err(DomainError::Forbidden(
                "reservation belongs to another user".to_string(),
            ))
        }
    }

    /// The caller's reservations, latest stay first.
    pub async fn list_for_tourist(
        &self,
        caller: &Caller,
        scope: ReservationScope,
    ) -> DomainResult<Vec<Reservation>> {
        caller.require_role(Role::Tourist, "list their reservations")?;
        let now = self.clock.now();
        let mut reservations = self.repos.reservations().find_for_tourist(&caller.id).await?;
        reservations.retain(|r| scope.includes(r, now));
        Ok(reservations)
    }

    /// Reservations of every cottage the caller owns, newest request first.
    pub async fn list_for_owner(
        &self,
        caller: &Caller,
        status: Option<ReservationStatus>,
    ) -> DomainResult<Vec<Reservation>> {
        caller.require_role(Role::Owner, "list cottage reservations")?;
        let cottage_ids: Vec<String> = self
            .repos
            .cottages()
            .find_by_owner(&caller.id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        self.repos
            .reservations()
            .find_for_cottages(&cottage_ids, status)
            .await
    }

    /// Blocking reservations of a cottage, ordered by check-in.
    pub async fn calendar(&self, cottage_id: &str) -> DomainResult<Vec<Reservation>> {
        self.ensure_cottage(cottage_id).await?;
        self.repos
            .reservations()
            .find_blocking_for_cottage(cottage_id)
            .await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn load(&self, reservation_id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))
    }

    async fn ensure_cottage(&self, cottage_id: &str) -> DomainResult<()> {
        self.repos.cottages().get_owner(cottage_id).await.map(|_| ())
    }

    async fn require_cottage_owner(
        &self,
        caller: &Caller,
        reservation: &Reservation,
        action: &str,
    ) -> DomainResult<()> {
        caller.require_role(Role::Owner, action)?;
        let owner_id = self.repos.cottages().get_owner(&reservation.cottage_id).await?;
        if owner_id != caller.id {
            return Err(DomainError::Forbidden(format!(
                "only the owner of cottage {} may {}",
                reservation.cottage_id, action
            )));
        }
        Ok(())
    }

    /// Apply the transition in memory, then store it only if nobody changed
    /// the status in between.
    async fn commit_transition<F>(
        &self,
        mut reservation: Reservation,
        action: ReservationAction,
        apply: F,
    ) -> DomainResult<Reservation>
    where
        F: FnOnce(&mut Reservation) -> DomainResult<()>,
    {
        let expected = reservation.status;
        apply(&mut reservation)?;

        let stored = self
            .repos
            .reservations()
            .update_status(&reservation, expected)
            .await?;
        if !stored {
            return Err(self.lost_race(&reservation.id, action).await);
        }

        metrics::counter!("reservation_transitions_total", "transition" => action.as_str())
            .increment(1);
        info!(
            reservation_id = %reservation.id,
            from = %expected,
            to = %reservation.status,
            "Reservation status changed"
        );
        Ok(reservation)
    }

    async fn lost_race(&self, reservation_id: &str, action: ReservationAction) -> DomainError {
        match self.repos.reservations().find_by_id(reservation_id).await {
            Ok(None) => DomainError::not_found("Reservation", reservation_id),
            Ok(Some(current)) => match current.status.apply(action) {
                Err(e) => e,
                Ok(_) => DomainError::InvalidState(format!(
                    "reservation {} was modified concurrently",
                    reservation_id
                )),
            },
            Err(e) => e,
        }
    }
}

fn require_own(caller: &Caller, reservation: &Reservation, action: &str) -> DomainResult<()> {
    if caller.id != reservation.tourist_id {
        return Err(DomainError::Forbidden(format!(
            "only the tourist who made the reservation may {} it",
            action
        )));
    }
    Ok(())
}
