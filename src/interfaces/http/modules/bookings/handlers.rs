//! Booking API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::*;
use crate::application::BookingService;
use crate::domain::AppointmentQuery;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PaginationParams;

#[derive(Clone)]
pub struct BookingHandlerState {
    pub bookings: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking confirmed and batteries locked", body = ApiResponse<BookingDetailsDto>),
        (status = 400, description = "Time outside the booking window"),
        (status = 403, description = "Subscription belongs to someone else"),
        (status = 409, description = "No swaps left or not enough ready batteries")
    )
)]
pub async fn create_booking(
    State(state): State<BookingHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDetailsDto>>), ApiError> {
    let details = state
        .bookings
        .create_booking(
            &auth.user_id,
            request.subscription_id,
            request.station_id,
            request.scheduled_at,
        )
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(details.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/me",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(MyBookingsParams),
    responses(
        (status = 200, description = "Caller's bookings", body = ApiResponse<PaginatedResponse<BookingDto>>)
    )
)]
pub async fn my_bookings(
    State(state): State<BookingHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(params): Query<MyBookingsParams>,
) -> ApiResult<PaginatedResponse<BookingDto>> {
    let query = AppointmentQuery {
        user_id: Some(auth.user_id),
        station_id: None,
        status: params.status.as_deref().map(parse_booking_status).transpose()?,
        pagination: PaginationParams::new(params.page, params.limit),
    };
    let result = state.bookings.list(query).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(ListBookingsParams),
    responses(
        (status = 200, description = "All bookings", body = ApiResponse<PaginatedResponse<BookingDto>>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingHandlerState>,
    Query(params): Query<ListBookingsParams>,
) -> ApiResult<PaginatedResponse<BookingDto>> {
    let query = AppointmentQuery {
        user_id: params.user_id,
        station_id: params.station_id,
        status: params.status.as_deref().map(parse_booking_status).transpose()?,
        pagination: PaginationParams::new(params.page, params.limit),
    };
    let result = state.bookings.list(query).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking with its locked slots", body = ApiResponse<BookingDetailsDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<BookingDetailsDto> {
    let details = state
        .bookings
        .get(id, &auth.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Cancelled; slots released", body = ApiResponse<BookingDto>),
        (status = 409, description = "Booking is no longer open")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingHandlerState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<BookingDto> {
    let appointment = state
        .bookings
        .cancel(id, &auth.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(appointment.into())))
}
