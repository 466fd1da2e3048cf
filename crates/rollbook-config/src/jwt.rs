use std::env;

use tracing::warn;

use crate::env_or;

const DEV_SECRET: &str = "rollbook-dev-secret-change-me";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET is not set; using the development secret");
            DEV_SECRET.to_string()
        });

        Self {
            secret,
            access_token_expiry: env_or("JWT_ACCESS_EXPIRY", 3600), // 1 hour
        }
    }
}
