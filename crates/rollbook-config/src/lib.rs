//! # Rollbook Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`server`]: bind address
//! - [`export`]: document branding and spreadsheet size cap
//!
//! Each type exposes `from_env()`, falling back to development defaults for
//! anything unset or unparsable.

pub mod cors;
pub mod export;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use export::ExportConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
