//! Customer API handlers

use axum::{Json, extract::Query, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, ROLE_CUSTOMER};
use crate::core::ServerState;
use crate::db::models::{Customer, CustomerCreate};
use crate::sequence::EntityKind;
use crate::utils::validation::{self, MAX_EMAIL_LEN, MAX_NAME_LEN};
use crate::utils::{AppError, AppResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub total_orders: u32,
    pub total_spent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_order_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Customer> for CustomerResponse {
    type Error = AppError;

    fn try_from(customer: Customer) -> Result<Self, Self::Error> {
        let id = customer
            .id
            .ok_or_else(|| AppError::internal("Customer record without id"))?
            .to_string();
        Ok(Self {
            id,
            code: customer.code,
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            total_orders: customer.total_orders,
            total_spent: customer.total_spent,
            last_order_date: customer.last_order_date,
            created_at: customer.created_at,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub token: String,
    pub customer: CustomerResponse,
}

fn validate_registration(req: &CustomerCreate) -> AppResult<()> {
    let mut errors = Vec::new();

    if let Err(e) = validation::validate_required_text(&req.name, "name", MAX_NAME_LEN) {
        errors.push(e.to_string());
    }

    let phone = req.phone.trim();
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() < 9 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        errors.push("Phone must be a valid number, e.g. +254700000000".to_string());
    }

    if let Some(email) = &req.email
        && (email.len() > MAX_EMAIL_LEN || !email.contains('@'))
    {
        errors.push("Email is not valid".to_string());
    }

    validation::collect_errors(errors)
}

/// POST /customers/register
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<CustomerCreate>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    validate_registration(&req)?;

    let phone = req.phone.trim().to_string();
    if state.customers.find_by_phone(&phone).await?.is_some() {
        return Err(AppError::conflict("Phone number is already registered"));
    }

    let code = state.allocator.allocate(EntityKind::Customer).await?;
    let now = Utc::now();
    let customer = state
        .customers
        .create(Customer {
            id: None,
            code,
            name: req.name.trim().to_string(),
            phone,
            email: req.email,
            total_orders: 0,
            total_spent: 0.0,
            last_order_date: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let response = CustomerResponse::try_from(customer)?;
    let token = state
        .jwt_service()
        .generate_token(&response.id, &response.name, ROLE_CUSTOMER)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token,
            customer: response,
        }),
    ))
}

/// GET /customers/me
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CustomerResponse>> {
    let customer = state
        .customers
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {}", user.id)))?;
    Ok(Json(CustomerResponse::try_from(customer)?))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /customers - staff listing
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CustomerResponse>>> {
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let customers = state.customers.find_all(limit).await?;
    customers
        .into_iter()
        .map(CustomerResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}
