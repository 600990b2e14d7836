//! Domain layer: entities, lifecycle rules and repository traits

pub mod cottage;
pub mod identity;
pub mod repositories;
pub mod reservation;

pub use cottage::{Cottage, CottageRepository};
pub use identity::{Caller, IdentityVerifier, Role};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    Reservation, ReservationAction, ReservationRepository, ReservationStatus, StayPeriod,
    StayPolicy,
};

pub use crate::shared::errors::DomainError;
