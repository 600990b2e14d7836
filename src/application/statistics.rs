//! Reservation statistics

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, Weekday};
use serde::Serialize;

use crate::domain::{Caller, DomainResult, RepositoryProvider, ReservationStatus, Role};
use crate::shared::Clock;

/// Marketplace-wide counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralStats {
    pub cottages: u64,
    pub reservations_last_24h: u64,
    pub reservations_last_7d: u64,
    pub reservations_last_30d: u64,
}

/// Approved reservations starting in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub reservations: u64,
}

/// Approved reservations of one cottage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CottageStats {
    pub cottage_id: String,
    pub cottage_name: String,
    /// Oldest month first
    pub by_month: Vec<MonthlyCount>,
    /// Stays starting on Saturday or Sunday (UTC)
    pub weekend: u64,
    pub working_day: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerStats {
    pub cottages: Vec<CottageStats>,
}

pub struct StatisticsService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl StatisticsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    pub async fn general(&self) -> DomainResult<GeneralStats> {
        let now = self.clock.now();
        let reservations = self.repos.reservations();

        Ok(GeneralStats {
            cottages: self.repos.cottages().count().await?,
            reservations_last_24h: reservations
                .count_created_since(now - Duration::hours(24))
                .await?,
            reservations_last_7d: reservations
                .count_created_since(now - Duration::days(7))
                .await?,
            reservations_last_30d: reservations
                .count_created_since(now - Duration::days(30))
                .await?,
        })
    }

    /// Per-cottage breakdown of the caller's approved reservations.
    pub async fn owner(&self, caller: &Caller) -> DomainResult<OwnerStats> {
        caller.require_role(Role::Owner, "view owner statistics")?;

        let cottages = self.repos.cottages().find_by_owner(&caller.id).await?;
        let ids: Vec<String> = cottages.iter().map(|c| c.id.clone()).collect();
        let approved = self
            .repos
            .reservations()
            .find_for_cottages(&ids, Some(ReservationStatus::Approved))
            .await?;

        let stats = cottages
            .into_iter()
            .map(|cottage| {
                let mut by_month: BTreeMap<(i32, u32), u64> = BTreeMap::new();
                let (mut weekend, mut working_day) = (0, 0);

                for r in approved.iter().filter(|r| r.cottage_id == cottage.id) {
                    let start = r.period.start();
                    *by_month.entry((start.year(), start.month())).or_default() += 1;
                    match start.weekday() {
                        Weekday::Sat | Weekday::Sun => weekend += 1,
                        _ => working_day += 1,
                    }
                }

                CottageStats {
                    cottage_id: cottage.id,
                    cottage_name: cottage.name,
                    by_month: by_month
                        .into_iter()
                        .map(|((year, month), reservations)| MonthlyCount {
                            year,
                            month,
                            reservations,
                        })
                        .collect(),
                    weekend,
                    working_day,
                }
            })
            .collect();

        Ok(OwnerStats { cottages: stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{date, seed_cottage, services_at, OWNER};
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn general_counts_by_creation_window() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let services = services_at(now).await;
        let cottage = seed_cottage(&services, OWNER).await;

        let tourist = Caller::tourist("t-1");
        services
            .reservations
            .create_reservation(&tourist, &cottage.id, date("2025-09-01"), date("2025-09-03"))
            .await
            .unwrap();

        let stats = services.statistics.general().await.unwrap();
        assert_eq!(
            stats,
            GeneralStats {
                cottages: 1,
                reservations_last_24h: 1,
                reservations_last_7d: 1,
                reservations_last_30d: 1,
            }
        );
    }

    #[tokio::test]
    async fn owner_stats_count_only_approved_stays() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let services = services_at(now).await;
        let cottage = seed_cottage(&services, OWNER).await;
        let owner = Caller::owner(OWNER);
        let tourist = Caller::tourist("t-1");

        // 2025-09-06 is a Saturday, 2025-09-10 a Wednesday.
        for (start, end) in [
            ("2025-09-06", "2025-09-08"),
            ("2025-09-10", "2025-09-12"),
            ("2025-10-01", "2025-10-03"),
        ] {
            let r = services
                .reservations
                .create_reservation(&tourist, &cottage.id, date(start), date(end))
                .await
                .unwrap();
            services.reservations.approve(&owner, &r.id).await.unwrap();
        }
        services
            .reservations
            .create_reservation(&tourist, &cottage.id, date("2025-11-01"), date("2025-11-03"))
            .await
            .unwrap();

        let stats = services.statistics.owner(&owner).await.unwrap();
        assert_eq!(stats.cottages.len(), 1);
        let c = &stats.cottages[0];
        assert_eq!(c.cottage_name, cottage.name);
        assert_eq!(
            c.by_month,
            vec![
                MonthlyCount { year: 2025, month: 9, reservations: 2 },
                MonthlyCount { year: 2025, month: 10, reservations: 1 },
            ]
        );
        assert_eq!((c.weekend, c.working_day), (1, 2));
    }

    #[tokio::test]
    async fn owner_stats_require_owner_role() {
        let services = services_at(Utc::now()).await;
        assert!(services
            .statistics
            .owner(&Caller::tourist("t-1"))
            .await
            .is_err());
    }
}
