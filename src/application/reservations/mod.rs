pub mod locks;
pub mod service;

pub use locks::CottageLocks;
pub use service::{ReservationScope, ReservationService};
