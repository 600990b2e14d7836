//! Statistics HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};

use super::dto::{GeneralStatsDto, OwnerStatsDto};
use crate::application::StatisticsService;
use crate::domain::Caller;
use crate::interfaces::http::common::{api_error, ApiResponse, ApiResult};

#[derive(Clone)]
pub struct StatsHandlerState {
    pub service: Arc<StatisticsService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/general",
    tag = "Statistics",
    responses(
        (status = 200, description = "Cottage count and recent reservation counts", body = ApiResponse<GeneralStatsDto>)
    )
)]
pub async fn general_stats(State(state): State<StatsHandlerState>) -> ApiResult<GeneralStatsDto> {
    let stats = state.service.general().await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/owner",
    tag = "Statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Approved reservations per cottage", body = ApiResponse<OwnerStatsDto>),
        (status = 403, description = "Caller is not an owner")
    )
)]
pub async fn owner_stats(
    State(state): State<StatsHandlerState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<OwnerStatsDto> {
    let stats = state.service.owner(&caller).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(stats.into())))
}
