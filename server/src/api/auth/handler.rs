//! Staff login handler
//!
//! The back office has a single operator account configured through the
//! environment. Customers never log in here; they get their token at
//! registration.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::ROLE_STAFF;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
    pub role: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (Some(username), Some(password)) = (
        state.config.staff_username.as_deref(),
        state.config.staff_password.as_deref(),
    ) else {
        security_log!("WARN", "login_disabled", username = req.username.clone());
        return Err(AppError::unauthorized());
    };

    if req.username != username || req.password != password {
        security_log!("WARN", "login_failed", username = req.username.clone());
        return Err(AppError::unauthorized());
    }

    let token = state
        .jwt_service()
        .generate_token(&format!("staff:{username}"), username, ROLE_STAFF)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    security_log!("INFO", "login_ok", username = req.username.clone());

    Ok(Json(LoginResponse {
        token,
        name: username.to_string(),
        role: ROLE_STAFF.to_string(),
    }))
}
