pub mod handler;

use axum::Router;
use axum::routing::{get, post, put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/me", put(handler::update_me))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/role", put(handler::update_role))
        .route("/{id}/unlock", post(handler::unlock))
}
