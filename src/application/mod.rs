//! Application layer: use cases over the domain repositories

pub mod cottages;
pub mod reservations;
pub mod statistics;

use std::sync::Arc;

pub use cottages::CottageService;
pub use reservations::{ReservationScope, ReservationService};
pub use statistics::{GeneralStats, OwnerStats, StatisticsService};

use crate::domain::{RepositoryProvider, StayPolicy};
use crate::shared::Clock;

/// All services sharing one repository provider and clock
#[derive(Clone)]
pub struct AppServices {
    pub reservations: Arc<ReservationService>,
    pub cottages: Arc<CottageService>,
    pub statistics: Arc<StatisticsService>,
}

impl AppServices {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        policy: StayPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reservations: Arc::new(ReservationService::new(
                repos.clone(),
                policy,
                clock.clone(),
            )),
            cottages: Arc::new(CottageService::new(repos.clone(), clock.clone())),
            statistics: Arc::new(StatisticsService::new(repos, clock)),
        }
    }
}
