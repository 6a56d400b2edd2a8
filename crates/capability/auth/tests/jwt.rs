use domain::UserContext;
use smartpark_auth::JwtManager;

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("secret".to_string(), 3600);
    let ctx = UserContext::new("user-1", "admin", "admin");

    let token = jwt.issue_token(&ctx).expect("token");
    let decoded = jwt.decode_access(&token.token).expect("decode");

    assert_eq!(decoded.user_id, "user-1");
    assert_eq!(decoded.username, "admin");
    assert_eq!(decoded.role, "admin");
    assert!(decoded.is_admin());
}

#[test]
fn wrong_secret_rejected() {
    let jwt = JwtManager::new("secret".to_string(), 3600);
    let ctx = UserContext::new("user-1", "admin", "admin");
    let token = jwt.issue_token(&ctx).expect("token");

    let other = JwtManager::new("other-secret".to_string(), 3600);
    assert!(other.decode_access(&token.token).is_err());
}
