//! Postgres 停车记录存储实现

use crate::error::StorageError;
use crate::models::{SessionClose, SessionRecord};
use crate::traits::SessionStore;
use domain::SessionStatus;
use sqlx::{PgPool, Row};

const SESSION_COLUMNS: &str = "record_id, car_id, slot_id, entry_time_ms, exit_time_ms, \
     duration_minutes, total_amount, status, notes, created_at_ms";

pub struct PgSessionStore {
    pub pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_session(row: &sqlx::postgres::PgRow) -> Result<SessionRecord, StorageError> {
    let status: String = row.try_get("status")?;
    let status = SessionStatus::parse(&status)
        .ok_or_else(|| StorageError::new(format!("invalid session status: {status}")))?;
    Ok(SessionRecord {
        record_id: row.try_get("record_id")?,
        car_id: row.try_get("car_id")?,
        slot_id: row.try_get("slot_id")?,
        entry_time_ms: row.try_get("entry_time_ms")?,
        exit_time_ms: row.try_get("exit_time_ms")?,
        duration_minutes: row.try_get("duration_minutes")?,
        total_amount: row.try_get("total_amount")?,
        status,
        notes: row.try_get("notes")?,
        created_at_ms: row.try_get("created_at_ms")?,
    })
}

#[async_trait::async_trait]
impl SessionStore for PgSessionStore {
    async fn create_session(
        &self,
        record: SessionRecord,
    ) -> Result<SessionRecord, StorageError> {
        sqlx::query(
            "insert into parking_records (record_id, car_id, slot_id, entry_time_ms, \
             exit_time_ms, duration_minutes, total_amount, status, notes, created_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&record.record_id)
        .bind(&record.car_id)
        .bind(&record.slot_id)
        .bind(record.entry_time_ms)
        .bind(record.exit_time_ms)
        .bind(record.duration_minutes)
        .bind(record.total_amount)
        .bind(record.status.as_str())
        .bind(&record.notes)
        .bind(record.created_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_session(
        &self,
        record_id: &str,
    ) -> Result<Option<SessionRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {SESSION_COLUMNS} from parking_records where record_id = $1"
        ))
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_session).transpose()
    }

    async fn find_active_by_car(
        &self,
        car_id: &str,
    ) -> Result<Option<SessionRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {SESSION_COLUMNS} from parking_records \
             where car_id = $1 and status = 'active' limit 1"
        ))
        .bind(car_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_session).transpose()
    }

    async fn close_session(
        &self,
        record_id: &str,
        close: SessionClose,
    ) -> Result<Option<SessionRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update parking_records set exit_time_ms = $2, duration_minutes = $3, \
             total_amount = $4, status = 'completed' \
             where record_id = $1 and status = 'active' \
             returning {SESSION_COLUMNS}"
        ))
        .bind(record_id)
        .bind(close.exit_time_ms)
        .bind(close.duration_minutes)
        .bind(close.total_amount)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_session).transpose()
    }

    async fn list_sessions(
        &self,
        status: Option<SessionStatus>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "select {SESSION_COLUMNS} from parking_records where status = $1 \
                     order by entry_time_ms desc offset $2 limit $3"
                ))
                .bind(status.as_str())
                .bind(offset as i64)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "select {SESSION_COLUMNS} from parking_records \
                     order by entry_time_ms desc offset $1 limit $2"
                ))
                .bind(offset as i64)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.iter().map(row_to_session).collect()
    }

    async fn count_sessions(&self, status: Option<SessionStatus>) -> Result<u64, StorageError> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("select count(*) from parking_records where status = $1")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("select count(*) from parking_records")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count as u64)
    }

    async fn find_by_entry_range(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {SESSION_COLUMNS} from parking_records \
             where entry_time_ms >= $1 and entry_time_ms <= $2 order by entry_time_ms"
        ))
        .bind(start_ms)
        .bind(end_ms)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_session).collect()
    }
}
