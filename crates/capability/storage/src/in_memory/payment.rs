//! 支付内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 支付创建与分页列表
//! - 报表取数：payment_date 区间查询（双端含）

use crate::error::StorageError;
use crate::models::PaymentRecord;
use crate::traits::PaymentStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// 支付内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryPaymentStore {
    payments: RwLock<HashMap<String, PaymentRecord>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self {
            payments: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPaymentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create_payment(
        &self,
        record: PaymentRecord,
    ) -> Result<PaymentRecord, StorageError> {
        let mut map = self
            .payments
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.payment_id) {
            return Err(StorageError::new("payment exists"));
        }
        map.insert(record.payment_id.clone(), record.clone());
        Ok(record)
    }

    async fn list_payments(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PaymentRecord>, StorageError> {
        let mut payments: Vec<PaymentRecord> = self
            .payments
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        payments.sort_by(|a, b| b.payment_date_ms.cmp(&a.payment_date_ms));
        Ok(payments
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_payments(&self) -> Result<u64, StorageError> {
        Ok(self
            .payments
            .read()
            .map(|map| map.len() as u64)
            .unwrap_or(0))
    }

    async fn find_by_date_range(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<PaymentRecord>, StorageError> {
        let mut payments: Vec<PaymentRecord> = self
            .payments
            .read()
            .map(|map| {
                map.values()
                    .filter(|payment| {
                        payment.payment_date_ms >= start_ms && payment.payment_date_ms <= end_ms
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        payments.sort_by(|a, b| a.payment_date_ms.cmp(&b.payment_date_ms));
        Ok(payments)
    }
}
