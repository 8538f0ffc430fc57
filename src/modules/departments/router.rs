use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    admit_students, approve_join_request, create_department, delete_department,
    get_assigned_classes, get_departments, get_pending_students, join_department,
    update_department, verify_department,
};

pub fn init_departments_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_departments)
                .post(create_department)
                .put(update_department)
                .delete(delete_department),
        )
        .route("/verify-dept_id", get(verify_department))
        .route("/join", post(join_department))
        .route("/requests/approve", post(approve_join_request))
        .route("/assigned-classes", get(get_assigned_classes))
        .route(
            "/requests/student",
            get(get_pending_students).post(admit_students),
        )
}
