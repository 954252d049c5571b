pub mod handler;

use axum::Router;
use axum::routing::{get, put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/{id}/pin", put(handler::toggle_pin))
}
