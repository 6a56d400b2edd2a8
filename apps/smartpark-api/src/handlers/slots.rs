//! 车位 handlers
//!
//! - GET /parking-slots - 列出活跃车位，可按状态过滤
//! - POST /parking-slots - 创建车位（仅管理员）
//! - GET /parking-slots/stats/summary - 占用统计

use crate::AppState;
use crate::middleware::{require_admin, require_user};
use crate::utils::response::{bad_request_error, slot_to_dto, storage_error};
use crate::utils::{normalize_required, now_ms};
use api_contract::{ApiResponse, CreateSlotRequest, SlotListResponse, SlotStatsDto, SlotsQuery};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::SlotStatus;
use smartpark_storage::SlotRecord;
use uuid::Uuid;

/// 列出车位
pub async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => match SlotStatus::parse(value) {
            Some(status) => Some(status),
            None => return bad_request_error("status must be available or occupied"),
        },
    };
    match state.slots.list_slots(status).await {
        Ok(slots) => {
            let response = SlotListResponse {
                total: slots.len() as u64,
                slots: slots.into_iter().map(slot_to_dto).collect(),
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建车位（仅管理员）
pub async fn create_slot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateSlotRequest>,
) -> Response {
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let slot_number = match normalize_required(req.slot_number, "slotNumber") {
        Ok(value) => value.to_uppercase(),
        Err(response) => return response,
    };
    let location = match normalize_required(req.location, "location") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.slots.find_by_number(&slot_number).await {
        Ok(Some(_)) => return bad_request_error("slot number already exists"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    let record = SlotRecord {
        slot_id: Uuid::new_v4().to_string(),
        slot_number,
        location,
        slot_status: SlotStatus::Available,
        is_active: true,
        created_at_ms: now_ms(),
    };
    match state.slots.create_slot(record).await {
        Ok(slot) => (
            StatusCode::OK,
            Json(ApiResponse::success(slot_to_dto(slot))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 占用统计
pub async fn slot_stats(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    match state.slots.list_slots(None).await {
        Ok(slots) => {
            let occupied = slots
                .iter()
                .filter(|slot| slot.slot_status == SlotStatus::Occupied)
                .count() as u64;
            let total = slots.len() as u64;
            let response = SlotStatsDto {
                total,
                available: total - occupied,
                occupied,
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(err) => storage_error(err),
    }
}
