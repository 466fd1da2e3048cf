use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use rollbook_config::JwtConfig;
use rollbook_core::AppError;

use crate::claims::Claims;

/// Signs an access token for `user_id` valid for `jwt_config.access_token_expiry` seconds.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + jwt_config.access_token_expiry) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

/// Validates signature and expiry. Any failure is reported as `Unauthorized`
/// without echoing the token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Not authorized to access this route"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            access_token_expiry: 60,
        }
    }

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "a@b.test", "staff", &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "staff");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = JwtConfig {
            access_token_expiry: -3600,
            ..config()
        };
        let token = create_access_token(Uuid::new_v4(), "a@b.test", "staff", &expired).unwrap();
        assert!(matches!(
            verify_token(&token, &config()),
            Err(AppError::Unauthorized(_))
        ));
    }
}
