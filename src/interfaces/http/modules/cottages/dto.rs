//! Cottage DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Cottage, DomainError, DomainResult, Reservation};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCottageRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CottageDto {
    pub id: String,
    pub name: String,
    pub location: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Cottage> for CottageDto {
    fn from(c: Cottage) -> Self {
        Self {
            id: c.id,
            name: c.name,
            location: c.location,
            owner_id: c.owner_id,
            created_at: c.created_at,
        }
    }
}

/// Calendar days, `YYYY-MM-DD`
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Reservation to leave out of the check, e.g. one being rescheduled
    pub exclude: Option<String>,
}

impl AvailabilityQuery {
    pub fn dates(&self) -> DomainResult<(NaiveDate, NaiveDate)> {
        Ok((parse_day("start", &self.start)?, parse_day("end", &self.end)?))
    }
}

fn parse_day(name: &str, value: &Option<String>) -> DomainResult<NaiveDate> {
    let raw = value
        .as_deref()
        .ok_or_else(|| DomainError::Validation(format!("query parameter '{}' is required", name)))?;
    raw.parse::<NaiveDate>().map_err(|_| {
        DomainError::Validation(format!("'{}' is not a date (expected YYYY-MM-DD)", raw))
    })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityDto {
    pub cottage_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available: bool,
}

/// An occupied stay; who booked it is not disclosed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalendarEntryDto {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// `unresolved` or `approved`
    pub status: String,
}

impl From<Reservation> for CalendarEntryDto {
    fn from(r: Reservation) -> Self {
        Self {
            start_date: r.period.start(),
            end_date: r.period.end(),
            status: r.status.as_str().to_string(),
        }
    }
}
