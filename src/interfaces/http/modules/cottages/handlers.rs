//! Cottage HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::{CottageService, ReservationService};
use crate::domain::Caller;
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct CottageHandlerState {
    pub cottages: Arc<CottageService>,
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/cottages",
    tag = "Cottages",
    security(("bearer_auth" = [])),
    request_body = CreateCottageRequest,
    responses(
        (status = 201, description = "Cottage registered", body = ApiResponse<CottageDto>),
        (status = 403, description = "Caller is not an owner"),
        (status = 422, description = "Invalid body")
    )
)]
pub async fn create_cottage(
    State(state): State<CottageHandlerState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(req): ValidatedJson<CreateCottageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CottageDto>>), ApiError> {
    let cottage = state
        .cottages
        .register(&caller, &req.name, &req.location)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(cottage.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/cottages/my",
    tag = "Cottages",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's cottages", body = ApiResponse<Vec<CottageDto>>),
        (status = 403, description = "Caller is not an owner")
    )
)]
pub async fn list_my_cottages(
    State(state): State<CottageHandlerState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Vec<CottageDto>> {
    let cottages = state.cottages.list_mine(&caller).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        cottages.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/cottages/{id}",
    tag = "Cottages",
    params(("id" = String, Path, description = "Cottage ID")),
    responses(
        (status = 200, description = "Cottage details", body = ApiResponse<CottageDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_cottage(
    State(state): State<CottageHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<CottageDto> {
    let cottage = state.cottages.get(&id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(cottage.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/cottages/{id}/availability",
    tag = "Cottages",
    params(("id" = String, Path, description = "Cottage ID"), AvailabilityQuery),
    responses(
        (status = 200, description = "Whether the stay is free", body = ApiResponse<AvailabilityDto>),
        (status = 400, description = "Missing or invalid dates"),
        (status = 404, description = "Unknown cottage")
    )
)]
pub async fn check_availability(
    State(state): State<CottageHandlerState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<AvailabilityDto> {
    let (start, end) = query.dates().map_err(api_error)?;
    let conflict = state
        .reservations
        .has_conflict(&id, start, end, query.exclude.as_deref())
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(AvailabilityDto {
        cottage_id: id,
        start_date: start,
        end_date: end,
        available: !conflict,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/cottages/{id}/calendar",
    tag = "Cottages",
    params(("id" = String, Path, description = "Cottage ID")),
    responses(
        (status = 200, description = "Occupied stays, by check-in", body = ApiResponse<Vec<CalendarEntryDto>>),
        (status = 404, description = "Unknown cottage")
    )
)]
pub async fn get_calendar(
    State(state): State<CottageHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<CalendarEntryDto>> {
    let entries = state.reservations.calendar(&id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(
        entries.into_iter().map(Into::into).collect(),
    )))
}
