//! Shared utilities
//!
//! - [`AppError`] / [`AppResult`] - application error type and handler result
//! - [`validation`] - text length limits and input checks
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult, ErrorBody};
