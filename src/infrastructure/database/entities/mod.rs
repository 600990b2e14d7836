//! Database entities module

pub mod cottage;
pub mod reservation;

pub use cottage::Entity as Cottage;
pub use reservation::Entity as Reservation;
