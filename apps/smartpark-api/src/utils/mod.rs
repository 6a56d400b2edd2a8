//! 工具模块

pub mod response;
pub mod validation;

pub use response::*;
pub use validation::*;

use std::time::{SystemTime, UNIX_EPOCH};

/// 当前时间戳（UTC 毫秒）。
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
