//! Postgres 报表存储实现
//!
//! 统计块（data）与签名块（signature）以 JSONB 持久化，
//! (report_type, period_key) 上有唯一索引兜底幂等 upsert。

use crate::error::StorageError;
use crate::models::ReportRecord;
use crate::traits::ReportStore;
use domain::{ReportData, ReportStatus, ReportType, SignatureBlock};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

const REPORT_COLUMNS: &str = "report_id, report_type, report_date_ms, period_key, start_ms, \
     end_ms, generated_by, data, signature, status, notes, created_at_ms, updated_at_ms";

pub struct PgReportStore {
    pub pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_status(value: &str) -> Result<ReportStatus, StorageError> {
    match value {
        "draft" => Ok(ReportStatus::Draft),
        "generated" => Ok(ReportStatus::Generated),
        "signed" => Ok(ReportStatus::Signed),
        "archived" => Ok(ReportStatus::Archived),
        other => Err(StorageError::new(format!("invalid report status: {other}"))),
    }
}

fn row_to_report(row: &sqlx::postgres::PgRow) -> Result<ReportRecord, StorageError> {
    let report_type: String = row.try_get("report_type")?;
    let report_type = ReportType::parse(&report_type)
        .ok_or_else(|| StorageError::new(format!("invalid report type: {report_type}")))?;
    let status: String = row.try_get("status")?;
    let data: Json<ReportData> = row.try_get("data")?;
    let signature: Option<Json<SignatureBlock>> = row.try_get("signature")?;
    Ok(ReportRecord {
        report_id: row.try_get("report_id")?,
        report_type,
        report_date_ms: row.try_get("report_date_ms")?,
        period_key: row.try_get("period_key")?,
        start_ms: row.try_get("start_ms")?,
        end_ms: row.try_get("end_ms")?,
        generated_by: row.try_get("generated_by")?,
        data: data.0,
        signature: signature.map(|signature| signature.0),
        status: parse_status(&status)?,
        notes: row.try_get("notes")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl ReportStore for PgReportStore {
    async fn find_report(
        &self,
        report_id: &str,
    ) -> Result<Option<ReportRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {REPORT_COLUMNS} from reports where report_id = $1"
        ))
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_report).transpose()
    }

    async fn find_by_period(
        &self,
        report_type: ReportType,
        period_key: &str,
    ) -> Result<Option<ReportRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {REPORT_COLUMNS} from reports where report_type = $1 and period_key = $2"
        ))
        .bind(report_type.as_str())
        .bind(period_key)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_report).transpose()
    }

    async fn create_report(&self, record: ReportRecord) -> Result<ReportRecord, StorageError> {
        sqlx::query(
            "insert into reports (report_id, report_type, report_date_ms, period_key, start_ms, \
             end_ms, generated_by, data, signature, status, notes, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&record.report_id)
        .bind(record.report_type.as_str())
        .bind(record.report_date_ms)
        .bind(&record.period_key)
        .bind(record.start_ms)
        .bind(record.end_ms)
        .bind(&record.generated_by)
        .bind(Json(&record.data))
        .bind(record.signature.as_ref().map(Json))
        .bind(record.status.as_str())
        .bind(&record.notes)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_report(
        &self,
        record: ReportRecord,
    ) -> Result<Option<ReportRecord>, StorageError> {
        let result = sqlx::query(
            "update reports set report_date_ms = $2, period_key = $3, start_ms = $4, \
             end_ms = $5, generated_by = $6, data = $7, signature = $8, status = $9, \
             notes = $10, updated_at_ms = $11 where report_id = $1",
        )
        .bind(&record.report_id)
        .bind(record.report_date_ms)
        .bind(&record.period_key)
        .bind(record.start_ms)
        .bind(record.end_ms)
        .bind(&record.generated_by)
        .bind(Json(&record.data))
        .bind(record.signature.as_ref().map(Json))
        .bind(record.status.as_str())
        .bind(&record.notes)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn list_reports(
        &self,
        report_type: Option<ReportType>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ReportRecord>, StorageError> {
        let rows = match report_type {
            Some(report_type) => {
                sqlx::query(&format!(
                    "select {REPORT_COLUMNS} from reports where report_type = $1 \
                     order by report_date_ms desc offset $2 limit $3"
                ))
                .bind(report_type.as_str())
                .bind(offset as i64)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "select {REPORT_COLUMNS} from reports \
                     order by report_date_ms desc offset $1 limit $2"
                ))
                .bind(offset as i64)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.iter().map(row_to_report).collect()
    }

    async fn count_reports(&self, report_type: Option<ReportType>) -> Result<u64, StorageError> {
        let count: i64 = match report_type {
            Some(report_type) => {
                sqlx::query_scalar("select count(*) from reports where report_type = $1")
                    .bind(report_type.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("select count(*) from reports")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count as u64)
    }
}
