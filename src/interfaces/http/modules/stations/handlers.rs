//! Station API handlers
//!
//! Reads are public so drivers can find a station before signing in;
//! mutations are admin-only (enforced by the router).

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::*;
use crate::application::{StationChanges, StationService};
use crate::domain::{Station, StationQuery};
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::shared::PaginationParams;

#[derive(Clone)]
pub struct StationHandlerState {
    pub stations: Arc<StationService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    params(ListStationsParams),
    responses(
        (status = 200, description = "Station list", body = ApiResponse<PaginatedResponse<StationDto>>)
    )
)]
pub async fn list_stations(
    State(state): State<StationHandlerState>,
    Query(params): Query<ListStationsParams>,
) -> ApiResult<PaginatedResponse<StationDto>> {
    let query = StationQuery {
        search: params.search,
        active_only: !params.include_inactive,
        pagination: PaginationParams::new(params.page, params.limit),
    };
    let result = state
        .stations
        .list_stations(query)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_station(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<StationDto> {
    let station = state.stations.get_station(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(station.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    security(("bearer_auth" = [])),
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station created", body = ApiResponse<StationDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_station(
    State(state): State<StationHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateStationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationDto>>), ApiError> {
    let station = Station::new(
        request.name,
        request.address,
        request.latitude,
        request.longitude,
    );
    let station = state
        .stations
        .create_station(station)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(station.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station ID")),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_station(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateStationRequest>,
) -> ApiResult<StationDto> {
    let changes = StationChanges {
        name: request.name,
        address: request.address,
        latitude: request.latitude,
        longitude: request.longitude,
        is_active: request.is_active,
    };
    let station = state
        .stations
        .update_station(id, changes)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(station.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station deleted"),
        (status = 409, description = "Station has open bookings")
    )
)]
pub async fn delete_station(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.stations.delete_station(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}

// ── Pillars ─────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}/pillars",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Pillars of the station", body = ApiResponse<Vec<PillarDto>>)
    )
)]
pub async fn list_pillars(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<PillarDto>> {
    let pillars = state.stations.list_pillars(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        pillars.into_iter().map(PillarDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/stations/{id}/pillars",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Station ID")),
    request_body = CreatePillarRequest,
    responses(
        (status = 201, description = "Pillar created with empty slots", body = ApiResponse<PillarWithSlotsDto>),
        (status = 409, description = "Pillar code already used at this station")
    )
)]
pub async fn create_pillar(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CreatePillarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PillarWithSlotsDto>>), ApiError> {
    let (pillar, slots) = state
        .stations
        .add_pillar(id, &request.code, request.slot_count)
        .await
        .map_err(domain_error)?;
    let dto = PillarWithSlotsDto {
        pillar: pillar.into(),
        slots: slots.into_iter().map(SlotDto::from).collect(),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

// ── Slots ───────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}/slots",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID"), SlotFilterParams),
    responses(
        (status = 200, description = "Slots of the station", body = ApiResponse<Vec<SlotDto>>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn list_slots(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
    Query(params): Query<SlotFilterParams>,
) -> ApiResult<Vec<SlotDto>> {
    let status = params.status.as_deref().map(parse_slot_status).transpose()?;
    let slots = state
        .stations
        .list_slots(id, status)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        slots.into_iter().map(SlotDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}/availability",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Slot counts per status", body = ApiResponse<AvailabilityDto>)
    )
)]
pub async fn get_availability(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<AvailabilityDto> {
    let availability = state.stations.availability(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(availability.into())))
}
