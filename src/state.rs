use rollbook_config::{CorsConfig, ExportConfig, JwtConfig};
use rollbook_db::{PgPool, init_db_pool, run_migrations};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub export_config: ExportConfig,
}

impl AppState {
    /// State over an existing pool with configuration read from the environment.
    pub fn with_pool(db: PgPool) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            export_config: ExportConfig::from_env(),
        }
    }
}

/// Connects, applies migrations and loads configuration.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool().await?;
    run_migrations(&db).await?;
    Ok(AppState::with_pool(db))
}
