use axum::{Router, routing::get};

use super::controller::{
    create_student, delete_student, get_student, get_students, get_students_by_class,
    update_student,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route("/class/{class_name}", get(get_students_by_class))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
