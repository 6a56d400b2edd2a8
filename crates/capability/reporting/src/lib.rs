//! 报表聚合核心。
//!
//! 对持久化的停车会话、支付与车位数做窗口聚合，产出日报/月报：
//! - 按 (报表类型, 周期键) 幂等 upsert，同一周期重复生成覆盖统计块
//! - 签名状态机：generated → signed，重复签名整体覆盖
//! - 分页列表、JSON 下载文件名、打印页渲染
//!
//! 所有窗口为 UTC 自然日/自然月，闭区间到毫秒。

pub mod render;
pub mod stats;
pub mod window;

use chrono::{NaiveDate, Utc};
use domain::{DayStat, PaymentMethodTotals, PeakHour, ReportStatus, ReportType, UserContext};
use smartpark_storage::{
    PaymentStore, ReportRecord, ReportStore, SessionRecord, SessionStore, SlotStore, StorageError,
};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::info;
use uuid::Uuid;

pub use render::{RenderRecord, render_report};

/// 生成响应附带的原始记录上限。
const SAMPLE_RECORD_LIMIT: usize = 50;
/// 摘要中的高峰时段条数。
const SUMMARY_PEAK_HOURS: usize = 3;
/// 月报摘要中的逐日统计条数（取月末方向）。
const SUMMARY_DAILY_STATS: usize = 7;

/// 报表核心错误。
#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    #[error("{0}")]
    Validation(String),
    #[error("report not found")]
    NotFound,
    #[error("report is signed and locked against regeneration")]
    SignedLocked,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for ReportingError {
    fn from(err: StorageError) -> Self {
        ReportingError::Storage(err.to_string())
    }
}

/// 日报摘要（随生成响应返回）。
#[derive(Debug, Clone)]
pub struct DailySummary {
    pub total_cars_parked: u64,
    pub total_revenue: f64,
    pub total_duration: i64,
    pub payment_methods: PaymentMethodTotals,
    pub peak_hours: Vec<PeakHour>,
}

/// 月报摘要（随生成响应返回）。
#[derive(Debug, Clone)]
pub struct MonthlySummary {
    pub total_cars_parked: u64,
    pub total_revenue: f64,
    pub total_duration: i64,
    pub payment_methods: PaymentMethodTotals,
    /// 月内最后 7 天的 (日期键, 统计) 对，日期升序。
    pub daily_stats: Vec<(String, DayStat)>,
}

/// 报表分页结果。
#[derive(Debug, Clone)]
pub struct ReportPage {
    pub reports: Vec<ReportRecord>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// 报表聚合服务。
pub struct ReportingService {
    sessions: Arc<dyn SessionStore>,
    payments: Arc<dyn PaymentStore>,
    slots: Arc<dyn SlotStore>,
    reports: Arc<dyn ReportStore>,
    /// 已签名周期是否允许重新生成（false 时返回 SignedLocked，不落库）。
    allow_regenerate_signed: bool,
}

impl ReportingService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        payments: Arc<dyn PaymentStore>,
        slots: Arc<dyn SlotStore>,
        reports: Arc<dyn ReportStore>,
        allow_regenerate_signed: bool,
    ) -> Self {
        Self {
            sessions,
            payments,
            slots,
            reports,
            allow_regenerate_signed,
        }
    }

    /// 生成（或重新生成）日报。
    ///
    /// `date` 缺省为今天（UTC）。返回持久化后的报表、窗口内原始
    /// 停车记录样本（最多 50 条，取数顺序）与摘要。
    pub async fn generate_daily(
        &self,
        ctx: &UserContext,
        date: Option<NaiveDate>,
    ) -> Result<(ReportRecord, Vec<SessionRecord>, DailySummary), ReportingError> {
        let started = Instant::now();
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let (start_ms, end_ms) = window::day_window(date);
        let period_key = window::day_key(date);

        let sessions = self.sessions.find_by_entry_range(start_ms, end_ms).await?;
        let payments = self.payments.find_by_date_range(start_ms, end_ms).await?;
        let total_slots = self.slots.count_active_slots().await?;

        let data = stats::daily_data(&sessions, &payments, total_slots);
        let summary = DailySummary {
            total_cars_parked: data.total_cars_parked,
            total_revenue: data.total_revenue,
            total_duration: data.total_duration,
            payment_methods: data.payment_methods.clone(),
            peak_hours: data.peak_hours.iter().take(SUMMARY_PEAK_HOURS).cloned().collect(),
        };

        let report = self
            .upsert(ctx, ReportType::Daily, period_key, start_ms, start_ms, end_ms, data)
            .await?;

        smartpark_telemetry::record_report_generated();
        smartpark_telemetry::record_generation_latency_ms(started.elapsed().as_millis() as u64);
        info!(
            report_id = %report.report_id,
            period_key = %report.period_key,
            cars = report.data.total_cars_parked,
            "daily report generated"
        );

        let mut samples = sessions;
        samples.truncate(SAMPLE_RECORD_LIMIT);
        Ok((report, samples, summary))
    }

    /// 生成（或重新生成）月报。
    ///
    /// `month_index` 为 0 基（0 = 一月），与历史导出的调用约定一致。
    pub async fn generate_monthly(
        &self,
        ctx: &UserContext,
        year: i32,
        month_index: u32,
    ) -> Result<(ReportRecord, MonthlySummary), ReportingError> {
        let started = Instant::now();
        let (start_ms, end_ms) = window::month_window(year, month_index)
            .ok_or_else(|| ReportingError::Validation("invalid year or month".to_string()))?;
        let period_key = window::month_key(year, month_index);

        let sessions = self.sessions.find_by_entry_range(start_ms, end_ms).await?;
        let payments = self.payments.find_by_date_range(start_ms, end_ms).await?;

        let data = stats::monthly_data(&sessions, &payments, start_ms, end_ms);
        let daily_stats: Vec<(String, DayStat)> = data
            .daily_stats
            .as_ref()
            .map(|stats| {
                let skip = stats.len().saturating_sub(SUMMARY_DAILY_STATS);
                stats
                    .iter()
                    .skip(skip)
                    .map(|(key, stat)| (key.clone(), stat.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let summary = MonthlySummary {
            total_cars_parked: data.total_cars_parked,
            total_revenue: data.total_revenue,
            total_duration: data.total_duration,
            payment_methods: data.payment_methods.clone(),
            daily_stats,
        };

        let report = self
            .upsert(ctx, ReportType::Monthly, period_key, start_ms, start_ms, end_ms, data)
            .await?;

        smartpark_telemetry::record_report_generated();
        smartpark_telemetry::record_generation_latency_ms(started.elapsed().as_millis() as u64);
        info!(
            report_id = %report.report_id,
            period_key = %report.period_key,
            cars = report.data.total_cars_parked,
            "monthly report generated"
        );
        Ok((report, summary))
    }

    /// 按 (类型, 周期键) upsert。
    ///
    /// 命中已有报表时覆盖窗口字段与统计块，签名与状态保持不变；
    /// 已签名且策略禁止时返回 SignedLocked，不写任何数据。
    #[allow(clippy::too_many_arguments)]
    async fn upsert(
        &self,
        ctx: &UserContext,
        report_type: ReportType,
        period_key: String,
        report_date_ms: i64,
        start_ms: i64,
        end_ms: i64,
        data: domain::ReportData,
    ) -> Result<ReportRecord, ReportingError> {
        let now = now_ms();
        match self.reports.find_by_period(report_type, &period_key).await? {
            Some(mut existing) => {
                if existing.status == ReportStatus::Signed && !self.allow_regenerate_signed {
                    return Err(ReportingError::SignedLocked);
                }
                existing.report_date_ms = report_date_ms;
                existing.start_ms = start_ms;
                existing.end_ms = end_ms;
                existing.generated_by = ctx.user_id.clone();
                existing.data = data;
                existing.updated_at_ms = now;
                self.reports
                    .update_report(existing)
                    .await?
                    .ok_or(ReportingError::NotFound)
            }
            None => {
                let record = ReportRecord {
                    report_id: Uuid::new_v4().to_string(),
                    report_type,
                    report_date_ms,
                    period_key,
                    start_ms,
                    end_ms,
                    generated_by: ctx.user_id.clone(),
                    data,
                    signature: None,
                    status: ReportStatus::Generated,
                    notes: None,
                    created_at_ms: now,
                    updated_at_ms: now,
                };
                Ok(self.reports.create_report(record).await?)
            }
        }
    }

    /// 为报表附加签名并迁移到 signed。
    ///
    /// signed_by 与 signature_data 为空白时校验失败，原状态与签名不动；
    /// 重复签名整体覆盖，不保留历史。
    pub async fn sign_report(
        &self,
        report_id: &str,
        signed_by: &str,
        signature_data: &str,
        position: Option<&str>,
    ) -> Result<ReportRecord, ReportingError> {
        if signed_by.trim().is_empty() || signature_data.trim().is_empty() {
            return Err(ReportingError::Validation(
                "signed by name and signature data are required".to_string(),
            ));
        }
        let mut report = self
            .reports
            .find_report(report_id)
            .await?
            .ok_or(ReportingError::NotFound)?;
        let now = now_ms();
        report.signature = Some(domain::SignatureBlock {
            signed_by: signed_by.trim().to_string(),
            signed_at_ms: now,
            signature_data: signature_data.to_string(),
            position: position
                .map(str::trim)
                .filter(|position| !position.is_empty())
                .unwrap_or("Manager")
                .to_string(),
        });
        report.status = ReportStatus::Signed;
        report.updated_at_ms = now;
        let signed = self
            .reports
            .update_report(report)
            .await?
            .ok_or(ReportingError::NotFound)?;
        smartpark_telemetry::record_report_signed();
        info!(report_id = %signed.report_id, "report signed");
        Ok(signed)
    }

    /// 分页列表，report_date 降序。page 为 1 基。
    pub async fn list_reports(
        &self,
        report_type: Option<ReportType>,
        page: u64,
        limit: u64,
    ) -> Result<ReportPage, ReportingError> {
        let page = page.max(1);
        let limit = limit.max(1);
        let offset = (page - 1) * limit;
        let reports = self.reports.list_reports(report_type, offset, limit).await?;
        let total = self.reports.count_reports(report_type).await?;
        Ok(ReportPage {
            reports,
            total,
            total_pages: total.div_ceil(limit),
            current_page: page,
        })
    }

    /// 按 id 取回报表。
    pub async fn find_report(&self, report_id: &str) -> Result<ReportRecord, ReportingError> {
        self.reports
            .find_report(report_id)
            .await?
            .ok_or(ReportingError::NotFound)
    }

    /// 下载：返回报表与附件文件名 `<type>-report-<YYYY-MM-DD>.json`。
    pub async fn download_report(
        &self,
        report_id: &str,
    ) -> Result<(ReportRecord, String), ReportingError> {
        let report = self.find_report(report_id).await?;
        let date = window::date_of_ms(report.report_date_ms)
            .map(window::day_key)
            .unwrap_or_default();
        let filename = format!("{}-report-{date}.json", report.report_type.as_str());
        smartpark_telemetry::record_report_downloaded();
        Ok((report, filename))
    }
}

/// 当前时间戳（UTC 毫秒）。
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
