//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - UserStore: InMemoryUserStore
//! - CarStore: InMemoryCarStore
//! - SlotStore: InMemorySlotStore
//! - SessionStore: InMemorySessionStore
//! - PaymentStore: InMemoryPaymentStore
//! - ReportStore: InMemoryReportStore

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
