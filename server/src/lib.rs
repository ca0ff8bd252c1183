//! Jikoni Server - restaurant ordering and back-office service
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/       # configuration, shared state, HTTP server
//! ├── auth/       # JWT tokens, extractor, middleware
//! ├── api/        # HTTP routes and handlers
//! ├── orders/     # order lifecycle: intake, state machines, money
//! ├── sequence/   # human-readable code allocation
//! ├── notify/     # notification side channel
//! ├── db/         # embedded SurrealDB models and repositories
//! └── utils/      # errors, validation, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod sequence;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro, tags auth events with a fixed target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging. Call once at startup.
pub fn setup_environment() {
    let _ = dotenv::dotenv();

    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());
}
