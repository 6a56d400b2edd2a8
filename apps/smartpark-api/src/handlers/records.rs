//! 停车记录 handlers
//!
//! - POST /parking-records - 车辆进场：按车牌取或建车辆，占用车位，
//!   创建活跃会话
//! - PUT  /parking-records/{id}/exit - 离场结算：派生时长与金额，
//!   迁移到 completed 并释放车位
//! - GET  /parking-records - 分页列表（entry_time 降序）
//! - GET  /parking-records/{id} - 记录详情
//!
//! 计费规则：每开始一小时按 hourly_rate 计费，不足一小时按一小时计。

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{
    bad_request_error, not_found_error, record_to_dto, storage_error,
};
use crate::utils::{normalize_optional, normalize_required, now_ms, page_params, total_pages};
use api_contract::{
    ApiResponse, CreateEntryRequest, ParkingRecordDto, RecordListResponse, RecordsQuery,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{SessionStatus, SlotStatus};
use smartpark_storage::{CarRecord, SessionClose, SessionRecord, StorageError};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct RecordPath {
    record_id: String,
}

/// 车辆进场
pub async fn create_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateEntryRequest>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let plate_number = match normalize_required(req.plate_number, "plateNumber") {
        Ok(value) => value.to_uppercase(),
        Err(response) => return response,
    };
    let driver_name = match normalize_required(req.driver_name, "driverName") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let phone_number = match normalize_required(req.phone_number, "phoneNumber") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let slot_number = match normalize_required(req.slot_number, "slotNumber") {
        Ok(value) => value.to_uppercase(),
        Err(response) => return response,
    };
    let notes = match normalize_optional(req.notes, "notes") {
        Ok(value) => value,
        Err(response) => return response,
    };

    // 按车牌取或建车辆
    let car = match state.cars.find_by_plate(&plate_number).await {
        Ok(Some(car)) => car,
        Ok(None) => {
            let record = CarRecord {
                car_id: Uuid::new_v4().to_string(),
                plate_number,
                driver_name,
                phone_number,
                car_model: req.car_model,
                car_color: req.car_color,
                is_active: true,
                created_at_ms: now_ms(),
            };
            match state.cars.create_car(record).await {
                Ok(car) => car,
                Err(err) => return storage_error(err),
            }
        }
        Err(err) => return storage_error(err),
    };

    // 同一车辆不能重复进场
    match state.sessions.find_active_by_car(&car.car_id).await {
        Ok(Some(_)) => return bad_request_error("car is already parked"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }

    // 车位必须存在且空闲
    let slot = match state.slots.find_by_number(&slot_number).await {
        Ok(Some(slot)) => slot,
        Ok(None) => return bad_request_error("parking slot not found"),
        Err(err) => return storage_error(err),
    };
    if slot.slot_status != SlotStatus::Available {
        return bad_request_error("parking slot is not available");
    }

    let now = now_ms();
    let record = SessionRecord {
        record_id: Uuid::new_v4().to_string(),
        car_id: car.car_id.clone(),
        slot_id: slot.slot_id.clone(),
        entry_time_ms: now,
        exit_time_ms: None,
        duration_minutes: None,
        total_amount: None,
        status: SessionStatus::Active,
        notes,
        created_at_ms: now,
    };
    let session = match state.sessions.create_session(record).await {
        Ok(session) => session,
        Err(err) => return storage_error(err),
    };
    if let Err(err) = state
        .slots
        .set_slot_status(&slot.slot_id, SlotStatus::Occupied)
        .await
    {
        return storage_error(err);
    }

    let dto = record_to_dto(session, Some(car), Some(slot));
    (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
}

/// 离场结算
pub async fn exit_record(
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let session = match state.sessions.find_session(&path.record_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };
    if session.status != SessionStatus::Active {
        return bad_request_error("parking record is already completed");
    }

    let exit_time_ms = now_ms();
    let elapsed_ms = (exit_time_ms - session.entry_time_ms).max(0);
    // 时长向上取整到分钟，计费向上取整到已开始的小时（至少 1 小时）
    let duration_minutes = (elapsed_ms as u64).div_ceil(60_000) as i64;
    let started_hours = (duration_minutes as u64).div_ceil(60).max(1);
    let total_amount = started_hours as f64 * state.hourly_rate;

    let close = SessionClose {
        exit_time_ms,
        duration_minutes,
        total_amount,
    };
    let closed = match state.sessions.close_session(&path.record_id, close).await {
        Ok(Some(closed)) => closed,
        Ok(None) => return bad_request_error("parking record is already completed"),
        Err(err) => return storage_error(err),
    };
    if let Err(err) = state
        .slots
        .set_slot_status(&closed.slot_id, SlotStatus::Available)
        .await
    {
        return storage_error(err);
    }

    match expand_record(&state, closed).await {
        Ok(dto) => (StatusCode::OK, Json(ApiResponse::success(dto))).into_response(),
        Err(err) => storage_error(err),
    }
}

/// 列出记录
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => match SessionStatus::parse(value) {
            Some(status) => Some(status),
            None => return bad_request_error("status must be active or completed"),
        },
    };
    let (page, limit, offset) = page_params(query.page, query.limit);

    let sessions = match state.sessions.list_sessions(status, offset, limit).await {
        Ok(sessions) => sessions,
        Err(err) => return storage_error(err),
    };
    let total = match state.sessions.count_sessions(status).await {
        Ok(total) => total,
        Err(err) => return storage_error(err),
    };

    let mut records = Vec::with_capacity(sessions.len());
    for session in sessions {
        match expand_record(&state, session).await {
            Ok(dto) => records.push(dto),
            Err(err) => return storage_error(err),
        }
    }
    let response = RecordListResponse {
        records,
        total_pages: total_pages(total, limit),
        current_page: page,
        total,
    };
    (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
}

/// 记录详情
pub async fn get_record(
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let session = match state.sessions.find_session(&path.record_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };
    match expand_record(&state, session).await {
        Ok(dto) => (StatusCode::OK, Json(ApiResponse::success(dto))).into_response(),
        Err(err) => storage_error(err),
    }
}

/// 展开记录的车辆与车位
pub async fn expand_record(
    state: &AppState,
    session: SessionRecord,
) -> Result<ParkingRecordDto, StorageError> {
    let car = state.cars.find_car(&session.car_id).await?;
    let slot = state.slots.find_slot(&session.slot_id).await?;
    Ok(record_to_dto(session, car, slot))
}
