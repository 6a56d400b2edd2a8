//! 数据库连接管理
//!
//! 提供数据库连接池初始化功能：
//! - connect_pool：建立 Postgres 连接池
//! - ensure_schema：建表（幂等，`create table if not exists`）
//!
//! 设计原则：
//! - 最大连接数限制为 8
//! - 使用 sqlx 提供的类型安全查询

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// 建立 Postgres 连接池
///
/// 从数据库 URL 创建连接池，最大连接数限制为 8。
///
/// # 参数
/// - `database_url`：Postgres 连接字符串
///
/// # 返回
/// - `Result<PgPool, StorageError>`：连接池或错误
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    Ok(pool)
}

const SCHEMA_STATEMENTS: &[&str] = &[
    "create table if not exists users ( \
         user_id text primary key, \
         username text not null unique, \
         password_hash text not null, \
         role text not null, \
         is_active boolean not null default true, \
         created_at_ms bigint not null \
     )",
    "create table if not exists cars ( \
         car_id text primary key, \
         plate_number text not null, \
         driver_name text not null, \
         phone_number text not null, \
         car_model text, \
         car_color text, \
         is_active boolean not null default true, \
         created_at_ms bigint not null \
     )",
    "create table if not exists parking_slots ( \
         slot_id text primary key, \
         slot_number text not null, \
         location text, \
         slot_status text not null, \
         is_active boolean not null default true, \
         created_at_ms bigint not null \
     )",
    "create table if not exists parking_records ( \
         record_id text primary key, \
         car_id text not null references cars (car_id), \
         slot_id text not null references parking_slots (slot_id), \
         entry_time_ms bigint not null, \
         exit_time_ms bigint, \
         duration_minutes bigint, \
         total_amount double precision, \
         status text not null, \
         notes text, \
         created_at_ms bigint not null \
     )",
    "create table if not exists payments ( \
         payment_id text primary key, \
         record_id text not null references parking_records (record_id), \
         amount_paid double precision not null, \
         payment_method text not null, \
         payment_date_ms bigint not null, \
         created_at_ms bigint not null \
     )",
    "create table if not exists reports ( \
         report_id text primary key, \
         report_type text not null, \
         report_date_ms bigint not null, \
         period_key text not null, \
         start_ms bigint not null, \
         end_ms bigint not null, \
         generated_by text not null, \
         data jsonb not null, \
         signature jsonb, \
         status text not null, \
         notes text, \
         created_at_ms bigint not null, \
         updated_at_ms bigint not null, \
         unique (report_type, period_key) \
     )",
    "create index if not exists idx_records_entry on parking_records (entry_time_ms)",
    "create index if not exists idx_payments_date on payments (payment_date_ms)",
];

/// 幂等建表
///
/// 逐条执行 `create table if not exists`，已存在的表不受影响。
/// (report_type, period_key) 上的唯一约束保证同一周期只有一份报表。
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StorageError> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
