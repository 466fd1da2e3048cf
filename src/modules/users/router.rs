use axum::{Router, routing::get};

use super::controller::{delete_user, get_user, get_users, get_users_by_role, update_user};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/role/{role}", get(get_users_by_role))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}
