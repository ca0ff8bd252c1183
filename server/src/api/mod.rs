//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - staff login
//! - [`customers`] - registration, profile, staff listing
//! - [`menu`] - public catalog and staff catalog management
//! - [`orders`] - intake, tracking, lifecycle transitions
//! - [`notifications`] - back-office feed

pub mod auth;
pub mod customers;
pub mod health;
pub mod menu;
pub mod notifications;
pub mod orders;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::core::ServerState;

/// HTTP access log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Assemble all resource routers
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(customers::router(state))
        .merge(menu::router(state))
        .merge(orders::router(state))
        .merge(notifications::router(state))
}

/// Finished application with state and tower layers applied
pub fn build_app(state: ServerState) -> Router {
    build_router(&state)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(middleware::from_fn(log_request))
}
