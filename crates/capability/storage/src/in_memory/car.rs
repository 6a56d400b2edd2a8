//! 车辆内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 车辆 CRUD（创建、查找、更新）
//! - 车牌唯一性校验
//! - 搜索匹配车牌/司机/电话（大小写不敏感子串）

use crate::error::StorageError;
use crate::models::{CarRecord, CarUpdate};
use crate::traits::CarStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// 车辆内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryCarStore {
    cars: RwLock<HashMap<String, CarRecord>>,
}

impl InMemoryCarStore {
    pub fn new() -> Self {
        Self {
            cars: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCarStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 搜索匹配：车牌/司机/电话任一字段包含关键字（忽略大小写）。
fn matches_search(car: &CarRecord, search: &str) -> bool {
    let needle = search.to_ascii_lowercase();
    car.plate_number.to_ascii_lowercase().contains(&needle)
        || car.driver_name.to_ascii_lowercase().contains(&needle)
        || car.phone_number.to_ascii_lowercase().contains(&needle)
}

impl InMemoryCarStore {
    /// 过滤 + created_at 降序排序的公共路径。
    fn filtered(&self, search: Option<&str>) -> Vec<CarRecord> {
        let mut cars: Vec<CarRecord> = self
            .cars
            .read()
            .map(|map| {
                map.values()
                    .filter(|car| car.is_active)
                    .filter(|car| search.is_none_or(|needle| matches_search(car, needle)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        cars.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        cars
    }
}

#[async_trait::async_trait]
impl CarStore for InMemoryCarStore {
    async fn list_cars(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<CarRecord>, StorageError> {
        Ok(self
            .filtered(search)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_cars(&self, search: Option<&str>) -> Result<u64, StorageError> {
        Ok(self.filtered(search).len() as u64)
    }

    async fn find_car(&self, car_id: &str) -> Result<Option<CarRecord>, StorageError> {
        Ok(self
            .cars
            .read()
            .ok()
            .and_then(|map| map.get(car_id).cloned())
            .filter(|car| car.is_active))
    }

    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<CarRecord>, StorageError> {
        Ok(self.cars.read().ok().and_then(|map| {
            map.values()
                .find(|car| car.plate_number == plate_number && car.is_active)
                .cloned()
        }))
    }

    async fn create_car(&self, record: CarRecord) -> Result<CarRecord, StorageError> {
        let mut map = self
            .cars
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map
            .values()
            .any(|car| car.plate_number == record.plate_number && car.is_active)
        {
            return Err(StorageError::new("plate number exists"));
        }
        map.insert(record.car_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_car(
        &self,
        car_id: &str,
        update: CarUpdate,
    ) -> Result<Option<CarRecord>, StorageError> {
        let mut map = self
            .cars
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let car = match map.get_mut(car_id) {
            Some(car) if car.is_active => car,
            _ => return Ok(None),
        };
        if let Some(driver_name) = update.driver_name {
            car.driver_name = driver_name;
        }
        if let Some(phone_number) = update.phone_number {
            car.phone_number = phone_number;
        }
        if let Some(car_model) = update.car_model {
            car.car_model = Some(car_model);
        }
        if let Some(car_color) = update.car_color {
            car.car_color = Some(car_color);
        }
        Ok(Some(car.clone()))
    }
}
