//! Handlers 模块

pub mod auth;
pub mod cars;
pub mod payments;
pub mod records;
pub mod reports;
pub mod slots;

pub use auth::*;
pub use cars::*;
pub use payments::*;
pub use records::*;
pub use reports::*;
pub use slots::*;

use axum::{Json, response::IntoResponse};

/// 健康检查
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
