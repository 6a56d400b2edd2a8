//! 角色常量。
//!
//! 系统只有两种角色：管理员（admin）与值班经理（manager）。

/// 管理员：可创建车位、注册用户。
pub const ADMIN: &str = "admin";

/// 值班经理：日常登记与报表操作。
pub const MANAGER: &str = "manager";

/// 校验角色取值是否合法。
pub fn is_valid(role: &str) -> bool {
    role == ADMIN || role == MANAGER
}
