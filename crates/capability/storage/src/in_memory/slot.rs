//! 车位内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 车位创建与查找（车位号唯一）
//! - 占用状态切换
//! - 活跃车位计数（报表占用率分母）

use crate::error::StorageError;
use crate::models::SlotRecord;
use crate::traits::SlotStore;
use domain::SlotStatus;
use std::collections::HashMap;
use std::sync::RwLock;

/// 车位内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemorySlotStore {
    slots: RwLock<HashMap<String, SlotRecord>>,
}

impl InMemorySlotStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySlotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SlotStore for InMemorySlotStore {
    async fn list_slots(
        &self,
        status: Option<SlotStatus>,
    ) -> Result<Vec<SlotRecord>, StorageError> {
        let mut slots: Vec<SlotRecord> = self
            .slots
            .read()
            .map(|map| {
                map.values()
                    .filter(|slot| slot.is_active)
                    .filter(|slot| status.is_none_or(|status| slot.slot_status == status))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        slots.sort_by(|a, b| a.slot_number.cmp(&b.slot_number));
        Ok(slots)
    }

    async fn count_active_slots(&self) -> Result<u64, StorageError> {
        Ok(self
            .slots
            .read()
            .map(|map| map.values().filter(|slot| slot.is_active).count() as u64)
            .unwrap_or(0))
    }

    async fn find_slot(&self, slot_id: &str) -> Result<Option<SlotRecord>, StorageError> {
        Ok(self
            .slots
            .read()
            .ok()
            .and_then(|map| map.get(slot_id).cloned()))
    }

    async fn find_by_number(
        &self,
        slot_number: &str,
    ) -> Result<Option<SlotRecord>, StorageError> {
        Ok(self.slots.read().ok().and_then(|map| {
            map.values()
                .find(|slot| slot.slot_number == slot_number && slot.is_active)
                .cloned()
        }))
    }

    async fn create_slot(&self, record: SlotRecord) -> Result<SlotRecord, StorageError> {
        let mut map = self
            .slots
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map
            .values()
            .any(|slot| slot.slot_number == record.slot_number && slot.is_active)
        {
            return Err(StorageError::new("slot number exists"));
        }
        map.insert(record.slot_id.clone(), record.clone());
        Ok(record)
    }

    async fn set_slot_status(
        &self,
        slot_id: &str,
        status: SlotStatus,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .slots
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(slot_id) {
            Some(slot) => {
                slot.slot_status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
