//! Postgres 车位存储实现

use crate::error::StorageError;
use crate::models::SlotRecord;
use crate::traits::SlotStore;
use domain::SlotStatus;
use sqlx::{PgPool, Row};

pub struct PgSlotStore {
    pub pool: PgPool,
}

impl PgSlotStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_slot(row: &sqlx::postgres::PgRow) -> Result<SlotRecord, StorageError> {
    let slot_status: String = row.try_get("slot_status")?;
    let slot_status = SlotStatus::parse(&slot_status)
        .ok_or_else(|| StorageError::new(format!("invalid slot_status: {slot_status}")))?;
    Ok(SlotRecord {
        slot_id: row.try_get("slot_id")?,
        slot_number: row.try_get("slot_number")?,
        location: row.try_get("location")?,
        slot_status,
        is_active: row.try_get("is_active")?,
        created_at_ms: row.try_get("created_at_ms")?,
    })
}

#[async_trait::async_trait]
impl SlotStore for PgSlotStore {
    async fn list_slots(
        &self,
        status: Option<SlotStatus>,
    ) -> Result<Vec<SlotRecord>, StorageError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "select slot_id, slot_number, location, slot_status, is_active, created_at_ms \
                     from parking_slots where is_active and slot_status = $1 \
                     order by slot_number",
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "select slot_id, slot_number, location, slot_status, is_active, created_at_ms \
                     from parking_slots where is_active order by slot_number",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.iter().map(row_to_slot).collect()
    }

    async fn count_active_slots(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("select count(*) from parking_slots where is_active")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn find_slot(&self, slot_id: &str) -> Result<Option<SlotRecord>, StorageError> {
        let row = sqlx::query(
            "select slot_id, slot_number, location, slot_status, is_active, created_at_ms \
             from parking_slots where slot_id = $1",
        )
        .bind(slot_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_slot).transpose()
    }

    async fn find_by_number(
        &self,
        slot_number: &str,
    ) -> Result<Option<SlotRecord>, StorageError> {
        let row = sqlx::query(
            "select slot_id, slot_number, location, slot_status, is_active, created_at_ms \
             from parking_slots where slot_number = $1 and is_active",
        )
        .bind(slot_number)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_slot).transpose()
    }

    async fn create_slot(&self, record: SlotRecord) -> Result<SlotRecord, StorageError> {
        sqlx::query(
            "insert into parking_slots (slot_id, slot_number, location, slot_status, is_active, \
             created_at_ms) values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.slot_id)
        .bind(&record.slot_number)
        .bind(&record.location)
        .bind(record.slot_status.as_str())
        .bind(record.is_active)
        .bind(record.created_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn set_slot_status(
        &self,
        slot_id: &str,
        status: SlotStatus,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update parking_slots set slot_status = $2 where slot_id = $1")
            .bind(slot_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
