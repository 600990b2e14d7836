//! Reservation domain entity and its lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::period::{StayPeriod, StayPolicy};
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Waiting for the owner's decision
    Unresolved,
    Approved,
    /// Refused by the owner, with a comment
    Denied,
    /// Withdrawn by the tourist
    Canceled,
}

/// A status change requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationAction {
    Approve,
    Deny,
    Cancel,
}

impl ReservationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deny => "deny",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for ReservationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ReservationStatus {
    /// Statuses that occupy the cottage's calendar.
    pub const BLOCKING: [ReservationStatus; 2] = [Self::Unresolved, Self::Approved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Canceled => "canceled",
        }
    }

    pub fn blocks_availability(self) -> bool {
        Self::BLOCKING.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Denied | Self::Canceled)
    }

    /// Transition table.
    ///
    /// | from                 | action  | to       |
    /// |----------------------|---------|----------|
    /// | unresolved           | approve | approved |
    /// | unresolved           | deny    | denied   |
    /// | unresolved, approved | cancel  | canceled |
    pub fn apply(self, action: ReservationAction) -> DomainResult<ReservationStatus> {
        use ReservationAction::*;
        use ReservationStatus::*;

        match (self, action) {
            (Unresolved, Approve) => Ok(Approved),
            (Unresolved, Deny) => Ok(Denied),
            (Unresolved | Approved, Cancel) => Ok(Canceled),
            (from, action) => Err(DomainError::InvalidState(format!(
                "cannot {} a reservation that is {}",
                action, from
            ))),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unresolved" => Ok(Self::Unresolved),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            "canceled" => Ok(Self::Canceled),
            other => Err(DomainError::Validation(format!(
                "unknown reservation status '{}'",
                other
            ))),
        }
    }
}

/// A tourist's request to stay in a cottage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: String,
    pub tourist_id: String,
    pub cottage_id: String,
    pub period: StayPeriod,
    pub status: ReservationStatus,
    /// Set only together with `Denied`
    pub deny_comment: Option<String>,
    pub is_reviewed: bool,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        tourist_id: impl Into<String>,
        cottage_id: impl Into<String>,
        period: StayPeriod,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tourist_id: tourist_id.into(),
            cottage_id: cottage_id.into(),
            period,
            status: ReservationStatus::Unresolved,
            deny_comment: None,
            is_reviewed: false,
            created_at,
        }
    }

    /// Past stays and refused/withdrawn requests.
    pub fn is_archived(&self, now: DateTime<Utc>) -> bool {
        self.period.end() < now || self.status.is_terminal()
    }

    pub fn approve(&mut self) -> DomainResult<()> {
        self.status = self.status.apply(ReservationAction::Approve)?;
        Ok(())
    }

    pub fn deny(&mut self, comment: &str) -> DomainResult<()> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(DomainError::Validation(
                "a comment is required to deny a reservation".to_string(),
            ));
        }
        self.status = self.status.apply(ReservationAction::Deny)?;
        self.deny_comment = Some(comment.to_string());
        Ok(())
    }

    /// Allowed until `policy.cancellation_window` before check-in.
    pub fn cancel(&mut self, now: DateTime<Utc>, policy: &StayPolicy) -> DomainResult<()> {
        let next = self.status.apply(ReservationAction::Cancel)?;
        if now > policy.cancellation_deadline(&self.period) {
            return Err(DomainError::InvalidState(format!(
                "cancellation is not allowed less than {}h before the start of the stay",
                policy.cancellation_window.num_hours()
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Returns `false` when the reservation was already marked.
    pub fn mark_reviewed(&mut self, now: DateTime<Utc>) -> DomainResult<bool> {
        if self.is_reviewed {
            return Ok(false);
        }
        if self.status != ReservationStatus::Approved || self.period.end() > now {
            return Err(DomainError::InvalidState(format!(
                "only a finished approved stay can be reviewed (status: {})",
                self.status
            )));
        }
        self.is_reviewed = true;
        Ok(true)
    }
}

// ── Tests ──────────────────────────────────────────────────────
