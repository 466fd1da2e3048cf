use rollbook_auth::{create_access_token, verify_token};
use rollbook_config::JwtConfig;
use rollbook_core::AppError;
use rollbook_models::UserRole;
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_all_roles() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for role in UserRole::ALL {
        let token = create_access_token(user_id, "test@example.com", role.as_str(), &jwt_config)
            .unwrap();
        let claims = verify_token(&token, &jwt_config).unwrap();
        assert_eq!(claims.role, role.as_str());
    }
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "test@example.com", "teacher", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "test@example.com");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "test@example.com", "admin", &jwt_config).unwrap();

    let other = JwtConfig {
        secret: "different_secret".to_string(),
        ..jwt_config
    };

    assert!(matches!(
        verify_token(&token, &other),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn test_verify_token_expired() {
    let jwt_config = JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        // well past the default 60s leeway
        access_token_expiry: -3600,
    };
    let token =
        create_access_token(Uuid::new_v4(), "test@example.com", "staff", &jwt_config).unwrap();

    assert!(verify_token(&token, &jwt_config).is_err());
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = get_test_jwt_config();
    for token in ["", "invalid", "a.b.c"] {
        assert!(verify_token(token, &jwt_config).is_err());
    }
}
