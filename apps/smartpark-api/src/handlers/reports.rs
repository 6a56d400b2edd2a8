//! 报表 handlers
//!
//! - GET  /reports/daily?date= - 生成（或重新生成）日报
//! - GET  /reports/monthly?year=&month= - 生成（或重新生成）月报
//! - POST /reports/{id}/sign - 附加签名
//! - GET  /reports/{id}/download - JSON 附件下载
//! - GET  /reports/{id}/print - 可打印 HTML
//! - GET  /reports?type=&page=&limit= - 分页列表
//!
//! month 参数为 0 基月份索引（0 = 一月），沿用历史导出的调用约定。

use crate::AppState;
use crate::handlers::records::expand_record;
use crate::middleware::require_user;
use crate::utils::response::{
    bad_request_error, report_to_dto, reporting_error, storage_error, user_to_summary,
};
use crate::utils::{now_ms, page_params};
use api_contract::{
    ApiResponse, DailyReportQuery, DailyReportResponse, DailySummaryDto, MonthlyReportQuery,
    MonthlyReportResponse, MonthlySummaryDto, ReportDto, ReportListResponse, ReportsQuery,
    SignReportRequest, UserSummaryDto,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::{Datelike, NaiveDate, Utc};
use domain::ReportType;
use smartpark_reporting::RenderRecord;
use smartpark_storage::{ReportRecord, StorageError};

#[derive(serde::Deserialize)]
pub struct ReportPath {
    report_id: String,
}

/// 生成日报
pub async fn generate_daily_report(
    State(state): State<AppState>,
    Query(query): Query<DailyReportQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let date = match query.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => return bad_request_error("date must be YYYY-MM-DD"),
        },
    };

    let (report, sessions, summary) = match state.reporting.generate_daily(&ctx, date).await {
        Ok(result) => result,
        Err(err) => return reporting_error(err),
    };

    let mut records = Vec::with_capacity(sessions.len());
    for session in sessions {
        match expand_record(&state, session).await {
            Ok(dto) => records.push(dto),
            Err(err) => return storage_error(err),
        }
    }
    let report = match to_report_dto(&state, report).await {
        Ok(dto) => dto,
        Err(err) => return storage_error(err),
    };
    let response = DailyReportResponse {
        report,
        records,
        summary: DailySummaryDto {
            total_cars_parked: summary.total_cars_parked,
            total_revenue: summary.total_revenue,
            total_duration: summary.total_duration,
            payment_methods: summary.payment_methods,
            peak_hours: summary.peak_hours,
        },
    };
    (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
}

/// 生成月报
pub async fn generate_monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyReportQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month_index = query.month.unwrap_or_else(|| today.month0());

    let (report, summary) = match state
        .reporting
        .generate_monthly(&ctx, year, month_index)
        .await
    {
        Ok(result) => result,
        Err(err) => return reporting_error(err),
    };
    let report = match to_report_dto(&state, report).await {
        Ok(dto) => dto,
        Err(err) => return storage_error(err),
    };
    let response = MonthlyReportResponse {
        report,
        summary: MonthlySummaryDto {
            total_cars_parked: summary.total_cars_parked,
            total_revenue: summary.total_revenue,
            total_duration: summary.total_duration,
            payment_methods: summary.payment_methods,
            daily_stats: summary.daily_stats,
        },
    };
    (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
}

/// 签名
pub async fn sign_report(
    State(state): State<AppState>,
    Path(path): Path<ReportPath>,
    headers: HeaderMap,
    Json(req): Json<SignReportRequest>,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let signed_by = req.signed_by.unwrap_or_default();
    let signature_data = req.signature_data.unwrap_or_default();
    let report = match state
        .reporting
        .sign_report(
            &path.report_id,
            &signed_by,
            &signature_data,
            req.position.as_deref(),
        )
        .await
    {
        Ok(report) => report,
        Err(err) => return reporting_error(err),
    };
    match to_report_dto(&state, report).await {
        Ok(dto) => (StatusCode::OK, Json(ApiResponse::success(dto))).into_response(),
        Err(err) => storage_error(err),
    }
}

/// JSON 附件下载
pub async fn download_report(
    State(state): State<AppState>,
    Path(path): Path<ReportPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let (report, filename) = match state.reporting.download_report(&path.report_id).await {
        Ok(result) => result,
        Err(err) => return reporting_error(err),
    };
    let dto = match to_report_dto(&state, report).await {
        Ok(dto) => dto,
        Err(err) => return storage_error(err),
    };
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Json(dto),
    )
        .into_response()
}

/// 可打印 HTML
pub async fn print_report(
    State(state): State<AppState>,
    Path(path): Path<ReportPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let report = match state.reporting.find_report(&path.report_id).await {
        Ok(report) => report,
        Err(err) => return reporting_error(err),
    };
    let generated_by = match resolve_generated_by(&state, &report.generated_by).await {
        Ok(summary) => summary,
        Err(err) => return storage_error(err),
    };
    let samples = match collect_render_records(&state, &report).await {
        Ok(samples) => samples,
        Err(err) => return storage_error(err),
    };
    let html = smartpark_reporting::render_report(&report, &generated_by.username, &samples, now_ms());
    Html(html).into_response()
}

/// 列表
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_user(&state, &headers) {
        return response;
    }
    let report_type = match query.report_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => match ReportType::parse(value) {
            Some(report_type) => Some(report_type),
            None => return bad_request_error("type must be daily or monthly"),
        },
    };
    let (page, limit, _) = page_params(query.page, query.limit);
    let result = match state.reporting.list_reports(report_type, page, limit).await {
        Ok(result) => result,
        Err(err) => return reporting_error(err),
    };
    let mut reports = Vec::with_capacity(result.reports.len());
    for report in result.reports {
        match to_report_dto(&state, report).await {
            Ok(dto) => reports.push(dto),
            Err(err) => return storage_error(err),
        }
    }
    let response = ReportListResponse {
        reports,
        total_pages: result.total_pages,
        current_page: result.current_page,
        total: result.total,
    };
    (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
}

/// 解析生成者摘要；用户已被删除时退化为占位摘要
async fn resolve_generated_by(
    state: &AppState,
    user_id: &str,
) -> Result<UserSummaryDto, StorageError> {
    Ok(state
        .users
        .find_by_id(user_id)
        .await?
        .as_ref()
        .map(user_to_summary)
        .unwrap_or_else(|| UserSummaryDto {
            id: user_id.to_string(),
            username: "system".to_string(),
            role: String::new(),
        }))
}

async fn to_report_dto(state: &AppState, report: ReportRecord) -> Result<ReportDto, StorageError> {
    let generated_by = resolve_generated_by(state, &report.generated_by).await?;
    Ok(report_to_dto(report, generated_by))
}

/// 打印页的样本记录：取统计块的前 10 个 record_id 展开
async fn collect_render_records(
    state: &AppState,
    report: &ReportRecord,
) -> Result<Vec<RenderRecord>, StorageError> {
    let mut samples = Vec::new();
    for record_id in report.data.record_ids.iter().take(10) {
        let Some(session) = state.sessions.find_session(record_id).await? else {
            continue;
        };
        let car = state.cars.find_car(&session.car_id).await?;
        let slot = state.slots.find_slot(&session.slot_id).await?;
        samples.push(RenderRecord {
            plate_number: car
                .as_ref()
                .map(|car| car.plate_number.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            driver_name: car
                .as_ref()
                .map(|car| car.driver_name.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            entry_time_ms: session.entry_time_ms,
            duration_minutes: session.duration_minutes,
            slot_number: slot
                .as_ref()
                .map(|slot| slot.slot_number.clone())
                .unwrap_or_else(|| "N/A".to_string()),
        });
    }
    Ok(samples)
}
