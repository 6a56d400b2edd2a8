//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：auth_error, forbidden_error, bad_request_error,
//!   not_found_error, conflict_error, internal_auth_error, storage_error,
//!   reporting_error
//! - DTO 转换：user_to_summary, car_to_dto, slot_to_dto, record_to_dto,
//!   payment_to_dto, report_to_dto
//!
//! 设计原则：
//! - 所有错误返回统一的 ApiResponse 格式
//! - HTTP 状态码与错误码对应
//! - DTO 转换保持 Record 和 DTO 字段一致

use api_contract::{
    ApiResponse, CarDto, ParkingRecordDto, PaymentDto, ReportDto, SlotDto, UserSummaryDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use smartpark_auth::AuthError;
use smartpark_reporting::ReportingError;
use smartpark_storage::{
    CarRecord, PaymentRecord, ReportRecord, SessionRecord, SlotRecord, StorageError, UserRecord,
};

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.FORBIDDEN", "forbidden")),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 已签名报表拒绝重新生成
pub fn signed_conflict_error() -> Response {
    (
        StatusCode::CONFLICT,
        Json(ApiResponse::<()>::error(
            "REPORT.SIGNED",
            "report is signed and locked against regeneration",
        )),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 报表核心错误到 HTTP 响应的映射
pub fn reporting_error(err: ReportingError) -> Response {
    match err {
        ReportingError::Validation(message) => bad_request_error(message),
        ReportingError::NotFound => not_found_error(),
        ReportingError::SignedLocked => signed_conflict_error(),
        ReportingError::Storage(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
        )
            .into_response(),
    }
}

/// UserRecord 转用户摘要
pub fn user_to_summary(record: &UserRecord) -> UserSummaryDto {
    UserSummaryDto {
        id: record.user_id.clone(),
        username: record.username.clone(),
        role: record.role.clone(),
    }
}

/// CarRecord 转 CarDto
pub fn car_to_dto(record: CarRecord) -> CarDto {
    CarDto {
        car_id: record.car_id,
        plate_number: record.plate_number,
        driver_name: record.driver_name,
        phone_number: record.phone_number,
        car_model: record.car_model,
        car_color: record.car_color,
        created_at: record.created_at_ms,
    }
}

/// SlotRecord 转 SlotDto
pub fn slot_to_dto(record: SlotRecord) -> SlotDto {
    SlotDto {
        slot_id: record.slot_id,
        slot_number: record.slot_number,
        location: record.location,
        slot_status: record.slot_status.as_str().to_string(),
        is_active: record.is_active,
    }
}

/// SessionRecord 转 ParkingRecordDto（车辆与车位由调用方解析）
pub fn record_to_dto(
    record: SessionRecord,
    car: Option<CarRecord>,
    slot: Option<SlotRecord>,
) -> ParkingRecordDto {
    ParkingRecordDto {
        record_id: record.record_id,
        car: car.map(car_to_dto),
        parking_slot: slot.map(slot_to_dto),
        entry_time: record.entry_time_ms,
        exit_time: record.exit_time_ms,
        duration: record.duration_minutes,
        total_amount: record.total_amount,
        status: record.status.as_str().to_string(),
        notes: record.notes,
    }
}

/// PaymentRecord 转 PaymentDto
pub fn payment_to_dto(record: PaymentRecord) -> PaymentDto {
    PaymentDto {
        payment_id: record.payment_id,
        record_id: record.record_id,
        amount_paid: record.amount_paid,
        payment_method: record.payment_method,
        payment_date: record.payment_date_ms,
    }
}

/// ReportRecord 转 ReportDto（生成者摘要由调用方解析）
pub fn report_to_dto(record: ReportRecord, generated_by: UserSummaryDto) -> ReportDto {
    ReportDto {
        report_id: record.report_id,
        report_type: record.report_type.as_str().to_string(),
        report_date: record.report_date_ms,
        period_key: record.period_key,
        start_date: record.start_ms,
        end_date: record.end_ms,
        generated_by,
        data: record.data,
        signature: record.signature,
        status: record.status.as_str().to_string(),
        notes: record.notes,
        created_at: record.created_at_ms,
        updated_at: record.updated_at_ms,
    }
}
