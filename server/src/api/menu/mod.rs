//! Menu catalog API

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::{require_auth, require_staff};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    // Browsing the catalog needs no account
    let public_routes = Router::new()
        .route("/menu", get(handler::list))
        .route("/menu/{id}", get(handler::get_by_id));

    let staff_routes = Router::new()
        .route("/menu", post(handler::create))
        .route("/menu/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public_routes.merge(staff_routes)
}
