//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::{ReservationScope, ReservationService};
use crate::domain::{Caller, Reservation, ReservationStatus};
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct ReservationHandlerState {
    pub service: Arc<ReservationService>,
}

fn dto(reservation: Reservation) -> Json<ApiResponse<ReservationDto>> {
    Json(ApiResponse::success(reservation.into()))
}

fn dtos(reservations: Vec<Reservation>) -> Json<ApiResponse<Vec<ReservationDto>>> {
    Json(ApiResponse::success(
        reservations.into_iter().map(Into::into).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation requested", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid dates"),
        (status = 403, description = "Caller is not a tourist"),
        (status = 404, description = "Unknown cottage"),
        (status = 409, description = "Cottage not available for selected period"),
        (status = 422, description = "Invalid body")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationHandlerState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(req): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let reservation = state
        .service
        .create_reservation(&caller, &req.cottage_id, req.start_date, req.end_date)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, dto(reservation)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/my",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(MyReservationsQuery),
    responses(
        (status = 200, description = "Caller's reservations, latest stay first", body = ApiResponse<Vec<ReservationDto>>),
        (status = 400, description = "Unknown scope"),
        (status = 403, description = "Caller is not a tourist")
    )
)]
pub async fn list_my_reservations(
    State(state): State<ReservationHandlerState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<MyReservationsQuery>,
) -> ApiResult<Vec<ReservationDto>> {
    let scope = match query.scope.as_deref() {
        Some(s) => s.parse::<ReservationScope>().map_err(api_error)?,
        None => ReservationScope::default(),
    };
    let reservations = state
        .service
        .list_for_tourist(&caller, scope)
        .await
        .map_err(api_error)?;
    Ok(dtos(reservations))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/owner",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(OwnerReservationsQuery),
    responses(
        (status = 200, description = "Reservations of the caller's cottages, newest first", body = ApiResponse<Vec<ReservationDto>>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Caller is not an owner")
    )
)]
pub async fn list_owner_reservations(
    State(state): State<ReservationHandlerState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<OwnerReservationsQuery>,
) -> ApiResult<Vec<ReservationDto>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ReservationStatus>)
        .transpose()
        .map_err(api_error)?;
    let reservations = state
        .service
        .list_for_owner(&caller, status)
        .await
        .map_err(api_error)?;
    Ok(dtos(reservations))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Not the tourist, cottage owner or an administrator"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationHandlerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.service.get(&caller, &id).await.map_err(api_error)?;
    Ok(dto(reservation))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/approve",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Approved", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Caller does not own the cottage"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation is no longer unresolved")
    )
)]
pub async fn approve_reservation(
    State(state): State<ReservationHandlerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.service.approve(&caller, &id).await.map_err(api_error)?;
    Ok(dto(reservation))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/deny",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = DenyReservationRequest,
    responses(
        (status = 200, description = "Denied", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Missing comment"),
        (status = 403, description = "Caller does not own the cottage"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation is no longer unresolved")
    )
)]
pub async fn deny_reservation(
    State(state): State<ReservationHandlerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<DenyReservationRequest>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .service
        .deny(&caller, &id, &req.deny_comment)
        .await
        .map_err(api_error)?;
    Ok(dto(reservation))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Canceled", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Not the caller's reservation"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already closed or inside the cancellation window")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationHandlerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state.service.cancel(&caller, &id).await.map_err(api_error)?;
    Ok(dto(reservation))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/reviewed",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Marked as reviewed", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Not the caller's reservation"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Stay not approved or not finished")
    )
)]
pub async fn mark_reservation_reviewed(
    State(state): State<ReservationHandlerState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .service
        .mark_reviewed(&caller, &id)
        .await
        .map_err(api_error)?;
    Ok(dto(reservation))
}
