//! Authentication and authorization
//!
//! - [`JwtService`] - token issue and validation
//! - [`CurrentUser`] - authenticated caller context
//! - [`require_auth`] / [`require_staff`] - router middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, ROLE_ADMIN, ROLE_CUSTOMER, ROLE_STAFF};
pub use middleware::{require_auth, require_staff};
