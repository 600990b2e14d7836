//! Statistics DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::statistics::{CottageStats, GeneralStats, MonthlyCount, OwnerStats};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneralStatsDto {
    pub cottages: u64,
    pub reservations_last_24h: u64,
    pub reservations_last_7d: u64,
    pub reservations_last_30d: u64,
}

impl From<GeneralStats> for GeneralStatsDto {
    fn from(s: GeneralStats) -> Self {
        Self {
            cottages: s.cottages,
            reservations_last_24h: s.reservations_last_24h,
            reservations_last_7d: s.reservations_last_7d,
            reservations_last_30d: s.reservations_last_30d,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlyCountDto {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub reservations: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CottageStatsDto {
    pub cottage_id: String,
    pub cottage_name: String,
    pub by_month: Vec<MonthlyCountDto>,
    /// Approved stays starting on Saturday or Sunday
    pub weekend: u64,
    pub working_day: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnerStatsDto {
    pub cottages: Vec<CottageStatsDto>,
}

impl From<MonthlyCount> for MonthlyCountDto {
    fn from(m: MonthlyCount) -> Self {
        Self {
            year: m.year,
            month: m.month,
            reservations: m.reservations,
        }
    }
}

impl From<CottageStats> for CottageStatsDto {
    fn from(c: CottageStats) -> Self {
        Self {
            cottage_id: c.cottage_id,
            cottage_name: c.cottage_name,
            by_month: c.by_month.into_iter().map(Into::into).collect(),
            weekend: c.weekend,
            working_day: c.working_day,
        }
    }
}

impl From<OwnerStats> for OwnerStatsDto {
    fn from(s: OwnerStats) -> Self {
        Self {
            cottages: s.cottages.into_iter().map(Into::into).collect(),
        }
    }
}
