//! PostgreSQL 存储实现模块
//!
//! 生产环境使用。建表语句见 `connection::ensure_schema`（启动时幂等执行）。
//!
//! 包含以下实现：
//! - UserStore: PgUserStore
//! - CarStore: PgCarStore
//! - SlotStore: PgSlotStore
//! - SessionStore: PgSessionStore
//! - PaymentStore: PgPaymentStore
//! - ReportStore: PgReportStore
//!
//! 设计要点：
//! - 所有 SQL 使用参数化查询，防止 SQL 注入
//! - 报表统计块/签名块经 serde_json 以 JSONB 读写

pub mod car;
pub mod payment;
pub mod report;
pub mod session;
pub mod slot;
pub mod user;

pub use car::*;
pub use payment::*;
pub use report::*;
pub use session::*;
pub use slot::*;
pub use user::*;
