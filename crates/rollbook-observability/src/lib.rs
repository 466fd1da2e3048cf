//! Rollbook Observability
//!
//! Provides configurable observability features including:
//! - Tracing and distributed tracing via OpenTelemetry
//! - Metrics collection via Prometheus
//! - HTTP request/response logging
//!
//! Compiled in with the `observability` feature (default). At runtime it can be
//! switched off with `OBSERVABILITY_ENABLED=false`, which leaves plain console
//! logging in place.
//!
//! ```no_run
//! use rollbook_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

pub mod basic_logging;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, track_export_rendered, track_jwt_issued,
    track_student_created, track_user_login_failure, track_user_login_success,
    track_user_registered,
};

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
static OBSERVABILITY_ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();

/// Check if observability is enabled via the `OBSERVABILITY_ENABLED` env var.
#[cfg(feature = "observability")]
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| parse_flag(&v))
            .unwrap_or(true)
    })
}

#[cfg_attr(not(feature = "observability"), allow(dead_code))]
fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    !(value.eq_ignore_ascii_case("false") || value == "0")
}

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    /// Stand-in for the Prometheus handle; never constructed.
    #[derive(Clone)]
    pub struct PrometheusHandle;

    impl PrometheusHandle {
        pub fn render(&self) -> String {
            String::new()
        }
    }

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Console logging only.
    pub fn init_tracing() {
        super::basic_logging::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn metrics_app<S>(_handle: PrometheusHandle) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Router::new()
    }

    pub fn track_user_registered(_role: &str) {}
    pub fn track_user_login_success(_role: &str) {}
    pub fn track_user_login_failure(_reason: &str) {}
    pub fn track_jwt_issued() {}
    pub fn track_student_created() {}
    pub fn track_export_rendered(_report: &str, _format: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
