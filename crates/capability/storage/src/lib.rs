//! # SmartPark Storage 模块
//!
//! 本模块提供统一的数据存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：定义所有资源存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：定义存储相关的数据结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 5. **实现层**：
//!    - `in_memory/`：内存存储实现（用于测试和演示）
//!    - `postgres/`：PostgreSQL 存储实现（生产环境使用）
//!
//! ## 资源说明
//!
//! - 用户（users）：登录账户，口令以 Argon2 哈希存储
//! - 车辆（cars）：按车牌唯一，由进场登记自动创建
//! - 车位（parking_slots）：进场占用、离场释放
//! - 停车记录（parking_records）：进/离场会话，离场时派生时长与金额
//! - 支付（payments）：结算记录，支付方式保留原始字符串
//! - 报表（reports）：按 (report_type, period_key) 幂等 upsert，
//!   统计块与签名块以 JSONB 持久化
//!
//! ## 核心特性
//!
//! - **类型安全**：使用 Rust 的类型系统和 sqlx 的参数化查询
//! - **异步支持**：基于 Tokio 的异步 I/O
//! - **可扩展性**：通过 Trait 接口支持多种存储后端

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;

pub use connection::{connect_pool, ensure_schema};
pub use error::StorageError;
pub use in_memory::{
    InMemoryCarStore, InMemoryPaymentStore, InMemoryReportStore, InMemorySessionStore,
    InMemorySlotStore, InMemoryUserStore,
};
pub use models::{
    CarRecord, CarUpdate, PaymentRecord, ReportRecord, SessionClose, SessionRecord, SlotRecord,
    UserRecord,
};
pub use postgres::{
    PgCarStore, PgPaymentStore, PgReportStore, PgSessionStore, PgSlotStore, PgUserStore,
};
pub use traits::{CarStore, PaymentStore, ReportStore, SessionStore, SlotStore, UserStore};
