//! Order API

mod handler;

use axum::{Router, middleware, routing::get, routing::patch, routing::post};

use crate::auth::{require_auth, require_staff};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    // Tracking is public: the order number plus the phone it was placed
    // with acts as the shared secret
    let public_routes = Router::new().route("/orders/track/{order_number}", get(handler::track));

    let customer_routes = Router::new()
        .route("/orders", post(handler::create))
        .route("/orders/my-orders", get(handler::my_orders))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let staff_routes = Router::new()
        .route("/orders", get(handler::list))
        .route("/orders/{id}", get(handler::get_by_id))
        .route("/orders/{id}/status", patch(handler::update_status))
        .route("/orders/{id}/payment", patch(handler::update_payment))
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public_routes.merge(customer_routes).merge(staff_routes)
}
