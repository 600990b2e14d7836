//! Reservation aggregate
//!
//! Contains the Reservation entity, its lifecycle, availability checking
//! and the repository interface.

pub mod availability;
pub mod model;
pub mod period;
pub mod repository;

pub use availability::{find_conflict, has_conflict};
pub use model::{Reservation, ReservationAction, ReservationStatus};
pub use period::{StayPeriod, StayPolicy};
pub use repository::ReservationRepository;
