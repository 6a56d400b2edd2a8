//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 认证接口：/auth/login, /auth/me, /auth/register
//! - 车辆管理：/cars/*
//! - 车位管理：/parking-slots/*
//! - 停车记录：/parking-records/*
//! - 支付记录：/payments/*
//! - 报表：/reports/*

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post, put},
};

/// 创建 API 路由
///
/// 返回包含所有 API 端点的 Router；main 同时挂载 / 与 /api/ 前缀。
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/register", post(register))
        .route("/cars", get(list_cars))
        .route("/cars/:car_id", get(get_car).put(update_car))
        .route("/cars/plate/:plate_number", get(get_car_by_plate))
        .route("/parking-slots", get(list_slots).post(create_slot))
        .route("/parking-slots/stats/summary", get(slot_stats))
        .route("/parking-records", get(list_records).post(create_entry))
        .route("/parking-records/:record_id", get(get_record))
        .route("/parking-records/:record_id/exit", put(exit_record))
        .route("/payments", get(list_payments).post(create_payment))
        .route("/reports", get(list_reports))
        .route("/reports/daily", get(generate_daily_report))
        .route("/reports/monthly", get(generate_monthly_report))
        .route("/reports/:report_id/sign", post(sign_report))
        .route("/reports/:report_id/download", get(download_report))
        .route("/reports/:report_id/print", get(print_report))
}

#[cfg(test)]
mod tests {
    use super::create_api_router;
    use crate::{AppState, middleware};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::{Router, middleware as axum_middleware};
    use http_body_util::BodyExt;
    use smartpark_auth::{AuthService, JwtManager, hash_password};
    use smartpark_reporting::ReportingService;
    use smartpark_storage::{
        InMemoryCarStore, InMemoryPaymentStore, InMemoryReportStore, InMemorySessionStore,
        InMemorySlotStore, InMemoryUserStore, UserRecord, UserStore,
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn test_app() -> Router {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        users
            .create_user(UserRecord {
                user_id: "u-admin".into(),
                username: "admin".into(),
                password_hash: hash_password("parkadmin123").unwrap(),
                role: domain::roles::ADMIN.into(),
                is_active: true,
                created_at_ms: 0,
            })
            .await
            .unwrap();
        let cars = Arc::new(InMemoryCarStore::new());
        let slots = Arc::new(InMemorySlotStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let payments = Arc::new(InMemoryPaymentStore::new());
        let reports = Arc::new(InMemoryReportStore::new());
        let jwt = JwtManager::new("test-secret".into(), 3600);
        let state = AppState {
            auth: Arc::new(AuthService::new(users.clone(), jwt)),
            users,
            cars: cars.clone(),
            slots: slots.clone(),
            sessions: sessions.clone(),
            payments: payments.clone(),
            reporting: Arc::new(ReportingService::new(
                sessions, payments, slots, reports, false,
            )),
            hourly_rate: 500.0,
        };
        let api = create_api_router();
        Router::new()
            .merge(api.clone())
            .nest("/api", api)
            .with_state(state)
            .layer(axum_middleware::from_fn(middleware::request_context))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(bytes.as_ref()).unwrap();
        (status, body)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn login(app: &Router) -> String {
        let (status, body) = send(
            app,
            post_json(
                "/auth/login",
                None,
                serde_json::json!({ "username": "admin", "password": "parkadmin123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_responds_on_both_prefixes() {
        let app = test_app().await;
        for uri in ["/health", "/api/health"] {
            let (status, body) = send(&app, get(uri, None)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["ok"], serde_json::json!(true));
        }
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/cars", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["error"]["code"], "AUTH.UNAUTHORIZED");
    }

    #[tokio::test]
    async fn entry_exit_payment_and_daily_report_flow() {
        let app = test_app().await;
        let token = login(&app).await;

        let (status, _) = send(
            &app,
            post_json(
                "/parking-slots",
                Some(&token),
                serde_json::json!({ "slotNumber": "a1", "location": "Level 1" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            post_json(
                "/api/parking-records",
                Some(&token),
                serde_json::json!({
                    "plateNumber": "rab 123 c",
                    "driverName": "Jean",
                    "phoneNumber": "0788000000",
                    "slotNumber": "A1"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["car"]["plateNumber"], "RAB 123 C");
        let record_id = body["data"]["recordId"].as_str().unwrap().to_string();

        // 车位已被占用，二次进场被拒绝
        let (status, body) = send(
            &app,
            post_json(
                "/parking-records",
                Some(&token),
                serde_json::json!({
                    "plateNumber": "RAC 456 D",
                    "driverName": "Alice",
                    "phoneNumber": "0788000001",
                    "slotNumber": "A1"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID.REQUEST");

        let exit = Request::builder()
            .method("PUT")
            .uri(format!("/parking-records/{record_id}/exit"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, exit).await;
        assert_eq!(status, StatusCode::OK);
        // 任何停留至少按一小时计费
        assert_eq!(body["data"]["totalAmount"], serde_json::json!(500.0));

        let (status, _) = send(
            &app,
            post_json(
                "/payments",
                Some(&token),
                serde_json::json!({
                    "recordId": record_id,
                    "amountPaid": 500.0,
                    "paymentMethod": "Cash"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, get("/reports/daily", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["summary"]["totalCarsParked"], 1);
        assert_eq!(
            body["data"]["summary"]["paymentMethods"]["cash"],
            serde_json::json!(500.0)
        );
        assert_eq!(body["data"]["report"]["status"], "generated");
    }
}
