use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize plain console logging.
///
/// Used when the `observability` feature is not compiled in or is switched off
/// at runtime. Every `tracing` macro still reaches stdout.
///
/// - **Log Level**: `LOG_LEVEL` (default `info`), or a full `RUST_LOG` filter
/// - **Filtering**: noisy dependencies held at `warn`
/// - **Format**: compact, with file and line
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rollbook={level},rollbook_core={level},rollbook_db={level},tower_http=warn,hyper=warn,sqlx=warn",
            level = log_level
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_err()
    {
        return;
    }

    eprintln!("Observability disabled - console logging only");
}
