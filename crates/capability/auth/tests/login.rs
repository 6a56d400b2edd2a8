use smartpark_auth::{AuthError, AuthService, JwtManager, hash_password};
use smartpark_storage::{InMemoryUserStore, UserRecord, UserStore};
use std::sync::Arc;

async fn service_with_user(username: &str, password: &str, is_active: bool) -> AuthService {
    let store = Arc::new(InMemoryUserStore::new());
    store
        .create_user(UserRecord {
            user_id: "user-1".into(),
            username: username.into(),
            password_hash: hash_password(password).expect("hash"),
            role: "manager".into(),
            is_active,
            created_at_ms: 0,
        })
        .await
        .expect("create");
    AuthService::new(store, JwtManager::new("secret".to_string(), 3600))
}

#[tokio::test]
async fn login_issues_verifiable_token() {
    let service = service_with_user("manager", "parking!", true).await;

    let (user, token) = service.login("manager", "parking!").await.expect("login");
    assert_eq!(user.username, "manager");

    let ctx = service.verify_access_token(&token.token).expect("verify");
    assert_eq!(ctx.user_id, "user-1");
    assert_eq!(ctx.role, "manager");
}

#[tokio::test]
async fn unknown_user_and_bad_password_look_the_same() {
    let service = service_with_user("manager", "parking!", true).await;

    let unknown = service.login("ghost", "parking!").await;
    let wrong = service.login("manager", "nope").await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn inactive_user_cannot_login() {
    let service = service_with_user("manager", "parking!", false).await;
    let result = service.login("manager", "parking!").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}
