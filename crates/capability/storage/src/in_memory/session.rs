//! 停车记录内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 进场记录创建、离场结算
//! - 活跃会话查找（防止同车重复进场）
//! - 报表取数：entry_time 区间查询（双端含，升序）

use crate::error::StorageError;
use crate::models::{SessionClose, SessionRecord};
use crate::traits::SessionStore;
use domain::SessionStatus;
use std::collections::HashMap;
use std::sync::RwLock;

/// 停车记录内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn filtered(&self, status: Option<SessionStatus>) -> Vec<SessionRecord> {
        let mut sessions: Vec<SessionRecord> = self
            .sessions
            .read()
            .map(|map| {
                map.values()
                    .filter(|session| status.is_none_or(|status| session.status == status))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sessions.sort_by(|a, b| b.entry_time_ms.cmp(&a.entry_time_ms));
        sessions
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(
        &self,
        record: SessionRecord,
    ) -> Result<SessionRecord, StorageError> {
        let mut map = self
            .sessions
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.record_id) {
            return Err(StorageError::new("record exists"));
        }
        map.insert(record.record_id.clone(), record.clone());
        Ok(record)
    }

    async fn find_session(
        &self,
        record_id: &str,
    ) -> Result<Option<SessionRecord>, StorageError> {
        Ok(self
            .sessions
            .read()
            .ok()
            .and_then(|map| map.get(record_id).cloned()))
    }

    async fn find_active_by_car(
        &self,
        car_id: &str,
    ) -> Result<Option<SessionRecord>, StorageError> {
        Ok(self.sessions.read().ok().and_then(|map| {
            map.values()
                .find(|session| session.car_id == car_id && session.status == SessionStatus::Active)
                .cloned()
        }))
    }

    async fn close_session(
        &self,
        record_id: &str,
        close: SessionClose,
    ) -> Result<Option<SessionRecord>, StorageError> {
        let mut map = self
            .sessions
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let session = match map.get_mut(record_id) {
            Some(session) if session.status == SessionStatus::Active => session,
            _ => return Ok(None),
        };
        session.exit_time_ms = Some(close.exit_time_ms);
        session.duration_minutes = Some(close.duration_minutes);
        session.total_amount = Some(close.total_amount);
        session.status = SessionStatus::Completed;
        Ok(Some(session.clone()))
    }

    async fn list_sessions(
        &self,
        status: Option<SessionStatus>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        Ok(self
            .filtered(status)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_sessions(&self, status: Option<SessionStatus>) -> Result<u64, StorageError> {
        Ok(self.filtered(status).len() as u64)
    }

    async fn find_by_entry_range(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<SessionRecord>, StorageError> {
        let mut sessions: Vec<SessionRecord> = self
            .sessions
            .read()
            .map(|map| {
                map.values()
                    .filter(|session| {
                        session.entry_time_ms >= start_ms && session.entry_time_ms <= end_ms
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sessions.sort_by(|a, b| a.entry_time_ms.cmp(&b.entry_time_ms));
        Ok(sessions)
    }
}
