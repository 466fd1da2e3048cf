use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by an access token.
///
/// The role is embedded so authorization needs no database round trip; a
/// role change takes effect when the user next logs in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    /// `admin`, `teacher` or `staff`
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "test@example.com".to_string(),
            role: "teacher".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(serialized.contains(r#""role":"teacher""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"u-456","email":"user@test.com","role":"admin","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "u-456");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, 9999999999);
    }
}
