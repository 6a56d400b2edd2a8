//! SmartPark 停车场管理 API 服务器。
//!
//! 启动流程：
//! 1. 加载 .env 与环境变量配置
//! 2. 初始化结构化日志
//! 3. 按配置选择存储后端（Postgres / 内存），Postgres 时幂等建表
//! 4. 可选的管理员种子账户（需显式提供口令）
//! 5. 组装认证与报表服务，挂载路由并启动

mod handlers;
mod middleware;
mod routes;
mod utils;

use axum::{Router, middleware as axum_middleware};
use smartpark_auth::{AuthService, JwtManager, hash_password};
use smartpark_config::{AppConfig, StoreKind};
use smartpark_reporting::ReportingService;
use smartpark_storage::{
    CarStore, InMemoryCarStore, InMemoryPaymentStore, InMemoryReportStore, InMemorySessionStore,
    InMemorySlotStore, InMemoryUserStore, PaymentStore, PgCarStore, PgPaymentStore, PgReportStore,
    PgSessionStore, PgSlotStore, PgUserStore, ReportStore, SessionStore, SlotStore, UserRecord,
    UserStore, connect_pool, ensure_schema,
};
use smartpark_telemetry::init_tracing;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 应用共享状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<dyn UserStore>,
    pub cars: Arc<dyn CarStore>,
    pub slots: Arc<dyn SlotStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub payments: Arc<dyn PaymentStore>,
    pub reporting: Arc<ReportingService>,
    /// 离场计费费率（每开始一小时）。
    pub hourly_rate: f64,
}

/// 各资源存储句柄。
struct Stores {
    users: Arc<dyn UserStore>,
    cars: Arc<dyn CarStore>,
    slots: Arc<dyn SlotStore>,
    sessions: Arc<dyn SessionStore>,
    payments: Arc<dyn PaymentStore>,
    reports: Arc<dyn ReportStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let stores = build_stores(&config).await?;
    seed_admin(&config, stores.users.as_ref()).await?;

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_ttl_seconds);
    let auth = Arc::new(AuthService::new(stores.users.clone(), jwt));
    let reporting = Arc::new(ReportingService::new(
        stores.sessions.clone(),
        stores.payments.clone(),
        stores.slots.clone(),
        stores.reports.clone(),
        config.allow_regenerate_signed,
    ));

    let state = AppState {
        auth,
        users: stores.users,
        cars: stores.cars,
        slots: stores.slots,
        sessions: stores.sessions,
        payments: stores.payments,
        reporting,
        hourly_rate: config.hourly_rate,
    };

    // 同时暴露 / 与 /api/ 两种前缀
    let api = routes::create_api_router();
    let app = Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http());

    info!(addr = %config.http_addr, "smartpark api listening");
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// 按配置构建存储后端。
async fn build_stores(config: &AppConfig) -> Result<Stores, Box<dyn std::error::Error>> {
    match config.store {
        StoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("SMARTPARK_DATABASE_URL is required for the postgres store")?;
            let pool = connect_pool(database_url).await?;
            ensure_schema(&pool).await?;
            info!("postgres store ready");
            Ok(Stores {
                users: Arc::new(PgUserStore::new(pool.clone())),
                cars: Arc::new(PgCarStore::new(pool.clone())),
                slots: Arc::new(PgSlotStore::new(pool.clone())),
                sessions: Arc::new(PgSessionStore::new(pool.clone())),
                payments: Arc::new(PgPaymentStore::new(pool.clone())),
                reports: Arc::new(PgReportStore::new(pool)),
            })
        }
        StoreKind::Memory => {
            info!("in-memory store ready (demo mode, data is not persisted)");
            Ok(Stores {
                users: Arc::new(InMemoryUserStore::new()),
                cars: Arc::new(InMemoryCarStore::new()),
                slots: Arc::new(InMemorySlotStore::new()),
                sessions: Arc::new(InMemorySessionStore::new()),
                payments: Arc::new(InMemoryPaymentStore::new()),
                reports: Arc::new(InMemoryReportStore::new()),
            })
        }
    }
}

/// 管理员种子账户（幂等）。
///
/// 仅当 SMARTPARK_SEED_ADMIN 开启时运行；口令由配置层强制要求，
/// 这里绝不落任何缺省凭据。
async fn seed_admin(
    config: &AppConfig,
    users: &dyn UserStore,
) -> Result<(), Box<dyn std::error::Error>> {
    if !config.seed_admin {
        return Ok(());
    }
    let Some(password) = config.admin_password.as_deref() else {
        // AppConfig::from_env 已经拦截了这种组合
        return Err("SMARTPARK_ADMIN_PASSWORD is required when seeding is enabled".into());
    };
    if users.find_by_username(&config.admin_username).await?.is_some() {
        info!(username = %config.admin_username, "admin user already present, skipping seed");
        return Ok(());
    }
    let record = UserRecord {
        user_id: uuid::Uuid::new_v4().to_string(),
        username: config.admin_username.clone(),
        password_hash: hash_password(password)?,
        role: domain::roles::ADMIN.to_string(),
        is_active: true,
        created_at_ms: utils::now_ms(),
    };
    users.create_user(record).await?;
    info!(username = %config.admin_username, "admin user seeded");
    Ok(())
}
