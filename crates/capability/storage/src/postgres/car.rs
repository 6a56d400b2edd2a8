//! Postgres 车辆存储实现

use crate::error::StorageError;
use crate::models::{CarRecord, CarUpdate};
use crate::traits::CarStore;
use sqlx::{PgPool, Row};

pub struct PgCarStore {
    pub pool: PgPool,
}

impl PgCarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_car(row: &sqlx::postgres::PgRow) -> Result<CarRecord, StorageError> {
    Ok(CarRecord {
        car_id: row.try_get("car_id")?,
        plate_number: row.try_get("plate_number")?,
        driver_name: row.try_get("driver_name")?,
        phone_number: row.try_get("phone_number")?,
        car_model: row.try_get("car_model")?,
        car_color: row.try_get("car_color")?,
        is_active: row.try_get("is_active")?,
        created_at_ms: row.try_get("created_at_ms")?,
    })
}

/// 搜索关键字转 LIKE 模式，转义 SQL 通配符。
fn like_pattern(search: &str) -> String {
    let escaped = search.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait::async_trait]
impl CarStore for PgCarStore {
    async fn list_cars(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<CarRecord>, StorageError> {
        let rows = match search {
            Some(search) => {
                sqlx::query(
                    "select car_id, plate_number, driver_name, phone_number, car_model, \
                     car_color, is_active, created_at_ms \
                     from cars where is_active \
                     and (plate_number ilike $1 or driver_name ilike $1 or phone_number ilike $1) \
                     order by created_at_ms desc offset $2 limit $3",
                )
                .bind(like_pattern(search))
                .bind(offset as i64)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "select car_id, plate_number, driver_name, phone_number, car_model, \
                     car_color, is_active, created_at_ms \
                     from cars where is_active \
                     order by created_at_ms desc offset $1 limit $2",
                )
                .bind(offset as i64)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.iter().map(row_to_car).collect()
    }

    async fn count_cars(&self, search: Option<&str>) -> Result<u64, StorageError> {
        let count: i64 = match search {
            Some(search) => {
                sqlx::query_scalar(
                    "select count(*) from cars where is_active \
                     and (plate_number ilike $1 or driver_name ilike $1 or phone_number ilike $1)",
                )
                .bind(like_pattern(search))
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("select count(*) from cars where is_active")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count as u64)
    }

    async fn find_car(&self, car_id: &str) -> Result<Option<CarRecord>, StorageError> {
        let row = sqlx::query(
            "select car_id, plate_number, driver_name, phone_number, car_model, car_color, \
             is_active, created_at_ms from cars where car_id = $1 and is_active",
        )
        .bind(car_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_car).transpose()
    }

    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<CarRecord>, StorageError> {
        let row = sqlx::query(
            "select car_id, plate_number, driver_name, phone_number, car_model, car_color, \
             is_active, created_at_ms from cars where plate_number = $1 and is_active",
        )
        .bind(plate_number)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_car).transpose()
    }

    async fn create_car(&self, record: CarRecord) -> Result<CarRecord, StorageError> {
        sqlx::query(
            "insert into cars (car_id, plate_number, driver_name, phone_number, car_model, \
             car_color, is_active, created_at_ms) values ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&record.car_id)
        .bind(&record.plate_number)
        .bind(&record.driver_name)
        .bind(&record.phone_number)
        .bind(&record.car_model)
        .bind(&record.car_color)
        .bind(record.is_active)
        .bind(record.created_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_car(
        &self,
        car_id: &str,
        update: CarUpdate,
    ) -> Result<Option<CarRecord>, StorageError> {
        let row = sqlx::query(
            "update cars set \
             driver_name = coalesce($2, driver_name), \
             phone_number = coalesce($3, phone_number), \
             car_model = coalesce($4, car_model), \
             car_color = coalesce($5, car_color) \
             where car_id = $1 and is_active \
             returning car_id, plate_number, driver_name, phone_number, car_model, car_color, \
             is_active, created_at_ms",
        )
        .bind(car_id)
        .bind(&update.driver_name)
        .bind(&update.phone_number)
        .bind(&update.car_model)
        .bind(&update.car_color)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_car).transpose()
    }
}
