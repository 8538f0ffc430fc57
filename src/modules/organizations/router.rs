use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_organization, delete_organization, get_organizations, update_organization,
};

pub fn init_organizations_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_organizations)
            .post(create_organization)
            .put(update_organization)
            .delete(delete_organization),
    )
}
