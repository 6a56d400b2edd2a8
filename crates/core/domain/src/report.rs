//! 报表领域类型。
//!
//! 定义报表及其统计块的共享结构：
//! - 枚举：ReportType、ReportStatus、SessionStatus、SlotStatus
//! - 统计块：ReportData（日报含高峰时段与车位利用率，月报含逐日统计）
//! - 签名块：SignatureBlock
//!
//! 统计块随报表以 JSON 持久化，字段名使用 camelCase 以保持导出文档稳定。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 已知支付方式。
///
/// 未识别的支付方式计入 `PaymentMethodTotals::other`。
pub mod payment_methods {
    pub const CASH: &str = "cash";
    pub const MOBILE_MONEY: &str = "mobile_money";
    pub const CARD: &str = "card";
}

/// 报表类型（创建后不可变）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Daily,
    Monthly,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Daily => "daily",
            ReportType::Monthly => "monthly",
        }
    }

    /// 解析查询参数中的报表类型。
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(ReportType::Daily),
            "monthly" => Some(ReportType::Monthly),
            _ => None,
        }
    }
}

/// 报表状态。
///
/// 创建即为 generated；附加签名时迁移到 signed。
/// draft/archived 由外部管理流程设置，本核心不驱动。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Generated,
    Signed,
    Archived,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Generated => "generated",
            ReportStatus::Signed => "signed",
            ReportStatus::Archived => "archived",
        }
    }
}

/// 停车会话状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            _ => None,
        }
    }
}

/// 车位状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Occupied,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Occupied => "occupied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(SlotStatus::Available),
            "occupied" => Some(SlotStatus::Occupied),
            _ => None,
        }
    }
}

/// 支付方式分桶金额。
///
/// 三个已知桶之和 <= totalRevenue；差额落入 other 桶，
/// 使分桶合计始终与总营收对账一致。
/// 字段名即导出键名（mobile_money 保持下划线，与历史导出兼容）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodTotals {
    pub cash: f64,
    pub mobile_money: f64,
    pub card: f64,
    #[serde(default)]
    pub other: f64,
}

/// 车位利用率（仅日报）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotUtilization {
    pub total_slots: u64,
    /// 活跃会话数 / 总车位数 × 100；总车位为 0 时恒为 0。
    pub average_occupancy: f64,
    /// 单小时最大进场数；无会话时为 0。
    pub peak_occupancy: u64,
}

/// 高峰时段条目：hour 为 0-23 的进场小时。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHour {
    pub hour: u32,
    pub count: u64,
}

/// 逐日统计条目（仅月报）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStat {
    pub cars: u64,
    pub revenue: f64,
    /// 当日会话时长合计（分钟）。
    pub duration: i64,
}

/// 报表统计块。
///
/// 重新生成报表时整体覆盖。日报填充 slot_utilization/peak_hours，
/// 月报填充 daily_stats（窗口内每个自然日一条，即使为空）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub total_cars_parked: u64,
    pub total_revenue: f64,
    /// 窗口内会话时长合计（分钟）；未结束的会话按 0 计入。
    pub total_duration: i64,
    pub payment_methods: PaymentMethodTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_utilization: Option<SlotUtilization>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peak_hours: Vec<PeakHour>,
    /// 逐日统计：键为 `YYYY-MM-DD`，BTreeMap 保证导出时按日期升序。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_stats: Option<BTreeMap<String, DayStat>>,
    #[serde(default)]
    pub record_ids: Vec<String>,
}

/// 报表签名块。
///
/// 重复签名整体覆盖，不保留历史。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBlock {
    pub signed_by: String,
    pub signed_at_ms: i64,
    /// 不透明签名载荷（如 base64 图像或文本署名）。
    pub signature_data: String,
    pub position: String,
}
