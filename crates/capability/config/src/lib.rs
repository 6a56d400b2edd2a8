//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 存储后端选择。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// PostgreSQL（生产环境默认）。
    Postgres,
    /// 内存存储（演示与测试）。
    Memory,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub store: StoreKind,
    /// Postgres 连接串；store = memory 时可缺省。
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: u64,
    /// 离场计费费率（每开始一小时）。
    pub hourly_rate: f64,
    /// 是否允许重新生成已签名的报表（默认允许，保持签名不变）。
    pub allow_regenerate_signed: bool,
    /// 管理员种子开关；开启时必须提供 SMARTPARK_ADMIN_PASSWORD。
    pub seed_admin: bool,
    pub admin_username: String,
    pub admin_password: Option<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("SMARTPARK_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("SMARTPARK_JWT_SECRET".to_string()))?;
        let jwt_ttl_seconds = read_u64_with_default("SMARTPARK_JWT_TTL_SECONDS", 86_400)?;
        let http_addr =
            env::var("SMARTPARK_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let store = read_store_kind("SMARTPARK_STORE")?;
        let database_url = read_optional("SMARTPARK_DATABASE_URL");
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("SMARTPARK_DATABASE_URL".to_string()));
        }
        let hourly_rate = read_f64_with_default("SMARTPARK_HOURLY_RATE", 500.0)?;
        if hourly_rate < 0.0 {
            return Err(ConfigError::Invalid(
                "SMARTPARK_HOURLY_RATE".to_string(),
                hourly_rate.to_string(),
            ));
        }
        let allow_regenerate_signed =
            read_bool_with_default("SMARTPARK_ALLOW_REGENERATE_SIGNED", true);
        let seed_admin = read_bool_with_default("SMARTPARK_SEED_ADMIN", false);
        let admin_username =
            env::var("SMARTPARK_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = read_optional("SMARTPARK_ADMIN_PASSWORD");
        // 种子账户不允许缺省口令：必须由运维显式提供
        if seed_admin && admin_password.is_none() {
            return Err(ConfigError::Missing(
                "SMARTPARK_ADMIN_PASSWORD".to_string(),
            ));
        }

        Ok(Self {
            http_addr,
            store,
            database_url,
            jwt_secret,
            jwt_ttl_seconds,
            hourly_rate,
            allow_regenerate_signed,
            seed_admin,
            admin_username,
            admin_password,
        })
    }
}

/// 读取存储后端选择。
fn read_store_kind(key: &str) -> Result<StoreKind, ConfigError> {
    match env::var(key) {
        Err(_) => Ok(StoreKind::Postgres),
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "" | "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(ConfigError::Invalid(key.to_string(), value)),
        },
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_f64_with_default(key: &str, default: f64) -> Result<f64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<f64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
