pub mod report;
pub mod roles;

pub use report::{
    DayStat, PaymentMethodTotals, PeakHour, ReportData, ReportStatus, ReportType, SessionStatus,
    SignatureBlock, SlotStatus, SlotUtilization, payment_methods,
};

/// 操作者上下文：所有模块共享的执行上下文。
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub username: String,
    pub role: String,
}

impl UserContext {
    /// 构造显式身份的操作者上下文。
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            role: role.into(),
        }
    }

    /// 是否拥有管理员角色。
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }
}

impl Default for UserContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            user_id: "".to_string(),
            username: "".to_string(),
            role: "".to_string(),
        }
    }
}
