use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{delete_student, get_students, join_section};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).delete(delete_student))
        .route("/join", post(join_section))
}
