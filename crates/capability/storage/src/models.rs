//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 用户模型：UserRecord
//! - 车辆模型：CarRecord, CarUpdate
//! - 车位模型：SlotRecord
//! - 停车记录模型：SessionRecord, SessionClose
//! - 支付模型：PaymentRecord
//! - 报表模型：ReportRecord
//!
//! 所有时间戳均为 UTC epoch 毫秒（`*_ms: i64`）。

use domain::{ReportData, ReportStatus, ReportType, SessionStatus, SignatureBlock, SlotStatus};

/// 用户记录。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    /// Argon2 口令哈希，绝不存明文。
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at_ms: i64,
}

impl UserRecord {
    /// 将用户记录转换为操作者上下文。
    pub fn to_user_context(&self) -> domain::UserContext {
        domain::UserContext::new(
            self.user_id.clone(),
            self.username.clone(),
            self.role.clone(),
        )
    }
}

/// 车辆记录。车牌统一大写存储。
#[derive(Debug, Clone)]
pub struct CarRecord {
    pub car_id: String,
    pub plate_number: String,
    pub driver_name: String,
    pub phone_number: String,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub is_active: bool,
    pub created_at_ms: i64,
}

/// 车辆更新输入。
#[derive(Debug, Clone, Default)]
pub struct CarUpdate {
    pub driver_name: Option<String>,
    pub phone_number: Option<String>,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
}

/// 车位记录。
#[derive(Debug, Clone)]
pub struct SlotRecord {
    pub slot_id: String,
    pub slot_number: String,
    pub location: String,
    pub slot_status: SlotStatus,
    pub is_active: bool,
    pub created_at_ms: i64,
}

/// 停车记录（会话）。
///
/// 进场时创建为 active；离场时填充 exit_time_ms/duration_minutes/
/// total_amount 并迁移到 completed。
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub record_id: String,
    pub car_id: String,
    pub slot_id: String,
    pub entry_time_ms: i64,
    pub exit_time_ms: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub total_amount: Option<f64>,
    pub status: SessionStatus,
    pub notes: Option<String>,
    pub created_at_ms: i64,
}

/// 离场结算输入。
#[derive(Debug, Clone)]
pub struct SessionClose {
    pub exit_time_ms: i64,
    pub duration_minutes: i64,
    pub total_amount: f64,
}

/// 支付记录。
///
/// payment_method 保留请求原始字符串；统计时未识别的方式计入 other 桶。
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub payment_id: String,
    pub record_id: String,
    pub amount_paid: f64,
    pub payment_method: String,
    pub payment_date_ms: i64,
    pub created_at_ms: i64,
}

/// 报表记录。
///
/// 周期唯一性由 (report_type, period_key) 保证：生成前先按键查找，
/// 命中则整体覆盖窗口字段与 data，不插入重复行。
#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub report_id: String,
    pub report_type: ReportType,
    /// 周期锚定日期。
    pub report_date_ms: i64,
    /// 规范周期键：日报 `YYYY-MM-DD`，月报 `YYYY-MM`。
    pub period_key: String,
    pub start_ms: i64,
    pub end_ms: i64,
    /// 生成者用户 ID。
    pub generated_by: String,
    pub data: ReportData,
    pub signature: Option<SignatureBlock>,
    pub status: ReportStatus,
    pub notes: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}
