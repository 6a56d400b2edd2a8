use smartpark_auth::{hash_password, verify_password};

#[test]
fn argon2_hash_verifies() {
    let hash = hash_password("admin123").expect("hash");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "admin123").expect("check"));
}

#[test]
fn wrong_password_rejected() {
    let hash = hash_password("admin123").expect("hash");
    assert!(!verify_password(&hash, "bad").expect("check"));
}

#[test]
fn plaintext_stored_value_is_an_error() {
    // 库里只允许 Argon2 哈希，明文口令视为数据损坏
    assert!(verify_password("admin123", "admin123").is_err());
}
