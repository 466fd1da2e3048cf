use rollbook_core::{hash_password, verify_password};

#[test]
fn test_hash_password_is_bcrypt() {
    let hash = hash_password("my_secure_password").unwrap();
    assert!(hash.starts_with("$2"));
    assert_ne!(hash, "my_secure_password");
}

#[test]
fn test_same_password_hashes_differently() {
    let first = hash_password("same_password").unwrap();
    let second = hash_password("same_password").unwrap();
    assert_ne!(first, second);
    assert!(verify_password("same_password", &first).unwrap());
    assert!(verify_password("same_password", &second).unwrap());
}

#[test]
fn test_verify_wrong_password() {
    let hash = hash_password("correct_password").unwrap();
    assert!(!verify_password("wrong_password", &hash).unwrap());
    assert!(!verify_password("", &hash).unwrap());
}

#[test]
fn test_unicode_password() {
    let password = "пароль密码🔐";
    let hash = hash_password(password).unwrap();
    assert!(verify_password(password, &hash).unwrap());
}
