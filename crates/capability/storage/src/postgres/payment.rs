//! Postgres 支付存储实现

use crate::error::StorageError;
use crate::models::PaymentRecord;
use crate::traits::PaymentStore;
use sqlx::{PgPool, Row};

pub struct PgPaymentStore {
    pub pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_payment(row: &sqlx::postgres::PgRow) -> Result<PaymentRecord, StorageError> {
    Ok(PaymentRecord {
        payment_id: row.try_get("payment_id")?,
        record_id: row.try_get("record_id")?,
        amount_paid: row.try_get("amount_paid")?,
        payment_method: row.try_get("payment_method")?,
        payment_date_ms: row.try_get("payment_date_ms")?,
        created_at_ms: row.try_get("created_at_ms")?,
    })
}

#[async_trait::async_trait]
impl PaymentStore for PgPaymentStore {
    async fn create_payment(
        &self,
        record: PaymentRecord,
    ) -> Result<PaymentRecord, StorageError> {
        sqlx::query(
            "insert into payments (payment_id, record_id, amount_paid, payment_method, \
             payment_date_ms, created_at_ms) values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.payment_id)
        .bind(&record.record_id)
        .bind(record.amount_paid)
        .bind(&record.payment_method)
        .bind(record.payment_date_ms)
        .bind(record.created_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_payments(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PaymentRecord>, StorageError> {
        let rows = sqlx::query(
            "select payment_id, record_id, amount_paid, payment_method, payment_date_ms, \
             created_at_ms from payments order by payment_date_ms desc offset $1 limit $2",
        )
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_payment).collect()
    }

    async fn count_payments(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("select count(*) from payments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn find_by_date_range(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<PaymentRecord>, StorageError> {
        let rows = sqlx::query(
            "select payment_id, record_id, amount_paid, payment_method, payment_date_ms, \
             created_at_ms from payments \
             where payment_date_ms >= $1 and payment_date_ms <= $2 order by payment_date_ms",
        )
        .bind(start_ms)
        .bind(end_ms)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_payment).collect()
    }
}
