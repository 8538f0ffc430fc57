use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_section, delete_section, get_sections};

pub fn init_sections_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_sections).post(create_section).delete(delete_section),
    )
}
