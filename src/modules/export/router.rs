use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{export_report, export_students};
use crate::state::AppState;

pub fn init_export_router() -> Router<AppState> {
    Router::new()
        .route("/students/{id}", get(export_students))
        .route("/reports/{type}", post(export_report))
}
