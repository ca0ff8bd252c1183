//! Back-office notification feed API

mod handler;

use axum::{Router, middleware, routing::get, routing::patch, routing::post};

use crate::auth::{require_auth, require_staff};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/notifications", get(handler::list))
        .route("/notifications/unread-count", get(handler::unread_count))
        .route("/notifications/{id}/read", patch(handler::mark_read))
        .route("/notifications/read-all", post(handler::mark_all_read))
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
