//! 稳定的 DTO 与 API 响应契约。

use domain::{DayStat, PaymentMethodTotals, PeakHour, ReportData, SignatureBlock};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

// ============================================================================
// 认证
// ============================================================================

/// 登录请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 用户摘要（不含口令字段）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryDto {
    pub id: String,
    pub username: String,
    pub role: String,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// access token 过期时刻（epoch 毫秒）。
    pub expires: u64,
    pub user: UserSummaryDto,
}

/// 当前用户响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: UserSummaryDto,
}

/// 用户注册请求体（仅管理员可调用）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

// ============================================================================
// 车辆
// ============================================================================

/// 车辆返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDto {
    pub car_id: String,
    pub plate_number: String,
    pub driver_name: String,
    pub phone_number: String,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub created_at: i64,
}

/// 车辆列表查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarsQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 车辆更新请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    pub driver_name: Option<String>,
    pub phone_number: Option<String>,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
}

/// 车辆分页列表。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarListResponse {
    pub cars: Vec<CarDto>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

// ============================================================================
// 车位
// ============================================================================

/// 车位返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    pub slot_id: String,
    pub slot_number: String,
    pub location: String,
    pub slot_status: String,
    pub is_active: bool,
}

/// 车位创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    pub slot_number: String,
    pub location: String,
}

/// 车位列表查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsQuery {
    pub status: Option<String>,
}

/// 车位列表。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotListResponse {
    pub slots: Vec<SlotDto>,
    pub total: u64,
}

/// 车位占用统计。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotStatsDto {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
}

// ============================================================================
// 停车记录
// ============================================================================

/// 停车记录返回结构（车辆与车位已展开）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingRecordDto {
    pub record_id: String,
    pub car: Option<CarDto>,
    pub parking_slot: Option<SlotDto>,
    /// 进场时刻（epoch 毫秒）。
    pub entry_time: i64,
    pub exit_time: Option<i64>,
    /// 停车时长（分钟），离场后填充。
    pub duration: Option<i64>,
    pub total_amount: Option<f64>,
    pub status: String,
    pub notes: Option<String>,
}

/// 车辆进场请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub plate_number: String,
    pub driver_name: String,
    pub phone_number: String,
    pub slot_number: String,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub notes: Option<String>,
}

/// 停车记录列表查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 停车记录分页列表。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordListResponse {
    pub records: Vec<ParkingRecordDto>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

// ============================================================================
// 支付
// ============================================================================

/// 支付返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub payment_id: String,
    pub record_id: String,
    pub amount_paid: f64,
    pub payment_method: String,
    /// 支付时刻（epoch 毫秒）。
    pub payment_date: i64,
}

/// 支付创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub record_id: String,
    pub amount_paid: f64,
    pub payment_method: String,
}

/// 支付列表查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 支付分页列表。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentDto>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

// ============================================================================
// 报表
// ============================================================================

/// 报表返回结构。
///
/// `data` 直接内嵌领域统计块；下载接口按原样导出本结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub report_id: String,
    pub report_type: String,
    /// 周期锚定日期（epoch 毫秒）。
    pub report_date: i64,
    /// 规范周期键：日报 `YYYY-MM-DD`，月报 `YYYY-MM`。
    pub period_key: String,
    pub start_date: i64,
    pub end_date: i64,
    pub generated_by: UserSummaryDto,
    pub data: ReportData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<SignatureBlock>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 日报生成查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportQuery {
    /// ISO 日期（YYYY-MM-DD），缺省为今天。
    pub date: Option<String>,
}

/// 月报生成查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportQuery {
    pub year: Option<i32>,
    /// 零基月份索引（0 = 一月）。
    pub month: Option<u32>,
}

/// 报表签名请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignReportRequest {
    pub signed_by: Option<String>,
    pub position: Option<String>,
    pub signature_data: Option<String>,
}

/// 报表列表查询参数。
#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 日报摘要（随生成响应返回）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummaryDto {
    pub total_cars_parked: u64,
    pub total_revenue: f64,
    pub total_duration: i64,
    pub payment_methods: PaymentMethodTotals,
    /// 前 3 个高峰时段。
    pub peak_hours: Vec<PeakHour>,
}

/// 月报摘要（随生成响应返回）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryDto {
    pub total_cars_parked: u64,
    pub total_revenue: f64,
    pub total_duration: i64,
    pub payment_methods: PaymentMethodTotals,
    /// 月内最后 7 天的逐日统计，(日期键, 统计) 对。
    pub daily_stats: Vec<(String, DayStat)>,
}

/// 日报生成响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportResponse {
    pub report: ReportDto,
    /// 底层停车记录样本（最多 50 条，按查询顺序）。
    pub records: Vec<ParkingRecordDto>,
    pub summary: DailySummaryDto,
}

/// 月报生成响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportResponse {
    pub report: ReportDto,
    pub summary: MonthlySummaryDto,
}

/// 报表分页列表。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    pub reports: Vec<ReportDto>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}
