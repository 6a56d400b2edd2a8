//! 报表内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 按 (报表类型, 周期键) 查找，支撑生成端的幂等 upsert
//! - 按 report_id 整体覆盖（重新生成 / 签名）
//! - report_date 降序分页列表

use crate::error::StorageError;
use crate::models::ReportRecord;
use crate::traits::ReportStore;
use domain::ReportType;
use std::collections::HashMap;
use std::sync::RwLock;

/// 报表内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryReportStore {
    reports: RwLock<HashMap<String, ReportRecord>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(HashMap::new()),
        }
    }

    fn filtered(&self, report_type: Option<ReportType>) -> Vec<ReportRecord> {
        let mut reports: Vec<ReportRecord> = self
            .reports
            .read()
            .map(|map| {
                map.values()
                    .filter(|report| {
                        report_type.is_none_or(|report_type| report.report_type == report_type)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        reports.sort_by(|a, b| b.report_date_ms.cmp(&a.report_date_ms));
        reports
    }
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ReportStore for InMemoryReportStore {
    async fn find_report(
        &self,
        report_id: &str,
    ) -> Result<Option<ReportRecord>, StorageError> {
        Ok(self
            .reports
            .read()
            .ok()
            .and_then(|map| map.get(report_id).cloned()))
    }

    async fn find_by_period(
        &self,
        report_type: ReportType,
        period_key: &str,
    ) -> Result<Option<ReportRecord>, StorageError> {
        Ok(self.reports.read().ok().and_then(|map| {
            map.values()
                .find(|report| {
                    report.report_type == report_type && report.period_key == period_key
                })
                .cloned()
        }))
    }

    async fn create_report(&self, record: ReportRecord) -> Result<ReportRecord, StorageError> {
        let mut map = self
            .reports
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.values().any(|report| {
            report.report_type == record.report_type && report.period_key == record.period_key
        }) {
            return Err(StorageError::new("report period exists"));
        }
        map.insert(record.report_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_report(
        &self,
        record: ReportRecord,
    ) -> Result<Option<ReportRecord>, StorageError> {
        let mut map = self
            .reports
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if !map.contains_key(&record.report_id) {
            return Ok(None);
        }
        map.insert(record.report_id.clone(), record.clone());
        Ok(Some(record))
    }

    async fn list_reports(
        &self,
        report_type: Option<ReportType>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ReportRecord>, StorageError> {
        Ok(self
            .filtered(report_type)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_reports(&self, report_type: Option<ReportType>) -> Result<u64, StorageError> {
        Ok(self.filtered(report_type).len() as u64)
    }
}
