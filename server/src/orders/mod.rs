//! Order lifecycle
//!
//! - [`service`] - intake, status and payment transitions, queries
//! - [`status`] - the order/payment state machines
//! - [`money`] - decimal-precise totals and rendering

pub mod money;
pub mod service;
pub mod status;

pub use service::{CreateOrderRequest, LineRequest, OrderService};
