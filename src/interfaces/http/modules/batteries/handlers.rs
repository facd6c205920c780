//! Battery API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::*;
use crate::application::{BatteryChanges, BatteryService};
use crate::domain::{Battery, BatteryQuery};
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::shared::PaginationParams;

#[derive(Clone)]
pub struct BatteryHandlerState {
    pub batteries: Arc<BatteryService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/batteries",
    tag = "Batteries",
    security(("bearer_auth" = [])),
    params(ListBatteriesParams),
    responses(
        (status = 200, description = "Battery list", body = ApiResponse<PaginatedResponse<BatteryDto>>)
    )
)]
pub async fn list_batteries(
    State(state): State<BatteryHandlerState>,
    Query(params): Query<ListBatteriesParams>,
) -> ApiResult<PaginatedResponse<BatteryDto>> {
    let query = BatteryQuery {
        station_id: params.station_id,
        status: params.status.as_deref().map(parse_battery_status).transpose()?,
        pagination: PaginationParams::new(params.page, params.limit),
    };
    let result = state.batteries.list(query).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(result))))
}

#[utoipa::path(
    get,
    path = "/api/v1/batteries/{id}",
    tag = "Batteries",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Battery serial")),
    responses(
        (status = 200, description = "Battery details", body = ApiResponse<BatteryDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_battery(
    State(state): State<BatteryHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<BatteryDto> {
    let battery = state.batteries.get(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(battery.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/batteries",
    tag = "Batteries",
    security(("bearer_auth" = [])),
    request_body = CreateBatteryRequest,
    responses(
        (status = 201, description = "Battery registered", body = ApiResponse<BatteryDto>),
        (status = 409, description = "Serial already registered")
    )
)]
pub async fn create_battery(
    State(state): State<BatteryHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateBatteryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BatteryDto>>), ApiError> {
    let mut battery = Battery::new(request.id, request.model, request.capacity_kwh);
    if let Some(soc) = request.state_of_charge {
        battery.state_of_charge = soc;
    }
    if let Some(soh) = request.state_of_health {
        battery.state_of_health = soh;
    }
    if let Some(status) = request.status.as_deref() {
        battery.status = parse_battery_status(status)?;
    }

    let battery = state.batteries.register(battery).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(battery.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/batteries/{id}",
    tag = "Batteries",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Battery serial")),
    request_body = UpdateBatteryRequest,
    responses(
        (status = 200, description = "Battery updated", body = ApiResponse<BatteryDto>),
        (status = 409, description = "Cannot retire a battery that sits in a slot")
    )
)]
pub async fn update_battery(
    State(state): State<BatteryHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateBatteryRequest>,
) -> ApiResult<BatteryDto> {
    let changes = BatteryChanges {
        model: request.model,
        capacity_kwh: request.capacity_kwh,
        state_of_charge: request.state_of_charge,
        state_of_health: request.state_of_health,
        status: request.status.as_deref().map(parse_battery_status).transpose()?,
    };
    let battery = state
        .batteries
        .update(&id, changes)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(battery.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/batteries/{id}",
    tag = "Batteries",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Battery serial")),
    responses(
        (status = 200, description = "Battery deleted"),
        (status = 409, description = "Battery sits in a slot")
    )
)]
pub async fn delete_battery(
    State(state): State<BatteryHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.batteries.delete(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}
