//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Reservation;

/// Booking request. Dates are calendar days; check-in and check-out times
/// are applied by the server.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub cottage_id: String,
    #[schema(example = "2025-09-10")]
    pub start_date: NaiveDate,
    #[schema(example = "2025-09-15")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DenyReservationRequest {
    /// Reason shown to the tourist; must not be blank
    #[serde(default)]
    pub deny_comment: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub tourist_id: String,
    pub cottage_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// `unresolved`, `approved`, `denied` or `canceled`
    pub status: String,
    pub deny_comment: Option<String>,
    pub is_reviewed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            tourist_id: r.tourist_id,
            cottage_id: r.cottage_id,
            start_date: r.period.start(),
            end_date: r.period.end(),
            status: r.status.as_str().to_string(),
            deny_comment: r.deny_comment,
            is_reviewed: r.is_reviewed,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MyReservationsQuery {
    /// `current`, `archive` or `all` (default)
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OwnerReservationsQuery {
    /// Only reservations with this status
    pub status: Option<String>,
}
