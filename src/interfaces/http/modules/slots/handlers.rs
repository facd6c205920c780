//! Slot API handlers (staff)

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{SlotBatteryRequest, SlotStatusRequest};
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::modules::stations::{parse_slot_status, SlotDto, StationHandlerState};

#[utoipa::path(
    put,
    path = "/api/v1/slots/{id}/battery",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Slot ID")),
    request_body = SlotBatteryRequest,
    responses(
        (status = 200, description = "Slot after the change", body = ApiResponse<SlotDto>),
        (status = 409, description = "Slot occupied or locked, or battery already slotted")
    )
)]
pub async fn set_slot_battery(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<SlotBatteryRequest>,
) -> ApiResult<SlotDto> {
    let slot = match request.battery_id {
        Some(battery_id) => state.stations.place_battery(id, &battery_id).await,
        None => state.stations.remove_battery(id).await,
    }
    .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(slot.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/slots/{id}/status",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Slot ID")),
    request_body = SlotStatusRequest,
    responses(
        (status = 200, description = "Slot after the change", body = ApiResponse<SlotDto>),
        (status = 409, description = "Lock is managed by bookings")
    )
)]
pub async fn set_slot_status(
    State(state): State<StationHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<SlotStatusRequest>,
) -> ApiResult<SlotDto> {
    let status = parse_slot_status(&request.status)?;
    let slot = state
        .stations
        .set_slot_status(id, status)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(slot.into())))
}
