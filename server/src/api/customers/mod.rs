//! Customer API

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::{require_auth, require_staff};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    // Registration is open; it is where customers get their token
    let public_routes = Router::new().route("/customers/register", post(handler::register));

    let customer_routes = Router::new()
        .route("/customers/me", get(handler::me))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let staff_routes = Router::new()
        .route("/customers", get(handler::list))
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public_routes.merge(customer_routes).merge(staff_routes)
}
