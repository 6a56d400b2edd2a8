//! 支付 handlers
//!
//! - POST /payments - 为已完成的停车记录登记支付
//! - GET  /payments - 分页列出支付（payment_date 降序）
//!
//! 支付方式保留请求原始字符串；报表统计时未识别的方式计入 other 桶。

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{bad_request_error, payment_to_dto, storage_error};
use crate::utils::{normalize_required, now_ms, page_params, total_pages};
use api_contract::{ApiResponse, CreatePaymentRequest, PaymentListResponse, PaymentsQuery};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::SessionStatus;
use smartpark_storage::PaymentRecord;
use uuid::Uuid;

/// 登记支付
pub async fn create_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreatePaymentRequest>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let record_id = match normalize_required(req.record_id, "recordId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let payment_method = match normalize_required(req.payment_method, "paymentMethod") {
        Ok(value) => value.to_lowercase(),
        Err(response) => return response,
    };
    if !req.amount_paid.is_finite() || req.amount_paid < 0.0 {
        return bad_request_error("amountPaid must be a non-negative number");
    }

    let session = match state.sessions.find_session(&record_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return bad_request_error("parking record not found"),
        Err(err) => return storage_error(err),
    };
    if session.status != SessionStatus::Completed {
        return bad_request_error("parking record must be completed before payment");
    }

    let now = now_ms();
    let record = PaymentRecord {
        payment_id: Uuid::new_v4().to_string(),
        record_id,
        amount_paid: req.amount_paid,
        payment_method,
        payment_date_ms: now,
        created_at_ms: now,
    };
    match state.payments.create_payment(record).await {
        Ok(payment) => (
            StatusCode::OK,
            Json(ApiResponse::success(payment_to_dto(payment))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 列出支付
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentsQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let (page, limit, offset) = page_params(query.page, query.limit);
    let payments = match state.payments.list_payments(offset, limit).await {
        Ok(payments) => payments,
        Err(err) => return storage_error(err),
    };
    let total = match state.payments.count_payments().await {
        Ok(total) => total,
        Err(err) => return storage_error(err),
    };
    let response = PaymentListResponse {
        payments: payments.into_iter().map(payment_to_dto).collect(),
        total_pages: total_pages(total, limit),
        current_page: page,
        total,
    };
    (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
}
