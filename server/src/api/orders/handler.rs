//! Order API handlers
//!
//! Enum-like fields (statuses, order type, payment method) arrive as
//! strings and are parsed explicitly so a bad value reads as invalid
//! input (400) rather than a malformed body.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    DeliveryAddress, Order, OrderStatus, OrderType, PaymentMethod, PaymentStatus,
};
use crate::orders::{CreateOrderRequest, LineRequest};
use crate::utils::{AppError, AppResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub menu_item_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_subtotal: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub items: Vec<LineResponse>,
    pub subtotal: f64,
    pub total: f64,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    /// Same value as `order_status`; clients read either key
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpesa_receipt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Order> for OrderResponse {
    type Error = AppError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        let id = order
            .id
            .ok_or_else(|| AppError::internal("Order record without id"))?
            .to_string();
        Ok(Self {
            id,
            order_number: order.order_number,
            phone: Some(order.phone),
            items: order
                .items
                .into_iter()
                .map(|l| LineResponse {
                    menu_item_id: l.menu_item.to_string(),
                    name: l.name,
                    unit_price: l.unit_price,
                    quantity: l.quantity,
                    line_subtotal: l.line_subtotal,
                })
                .collect(),
            subtotal: order.subtotal,
            total: order.total,
            order_type: order.order_type,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            order_status: order.order_status,
            status: order.order_status,
            delivery_address: order.delivery_address,
            notes: order.notes,
            mpesa_receipt: order.mpesa_receipt,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }
}

impl OrderResponse {
    /// Strip fields a caller who has not proven the order's phone may not see.
    fn into_public_summary(mut self) -> Self {
        self.phone = None;
        self.mpesa_receipt = None;
        self.notes = None;
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBody {
    pub menu_item_id: String,
    pub quantity: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub items: Vec<LineBody>,
    pub order_type: String,
    pub payment_method: String,
    #[serde(default)]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// POST /orders
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(body): Json<CreateOrderBody>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let request = CreateOrderRequest {
        customer_id: user.id,
        items: body
            .items
            .into_iter()
            .map(|l| LineRequest {
                menu_item_id: l.menu_item_id,
                // Out-of-range quantities fall through to intake validation,
                // which names the violated bound
                quantity: l.quantity.clamp(0, i64::from(u32::MAX)) as u32,
            })
            .collect(),
        order_type: body.order_type.parse::<OrderType>()?,
        payment_method: body.payment_method.parse::<PaymentMethod>()?,
        delivery_address: body.delivery_address,
        notes: body.notes,
    };

    let order = state.orders.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::try_from(order)?)))
}

/// GET /orders/my-orders
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders = state.orders.list_for_customer(&user.id).await?;
    orders
        .into_iter()
        .map(OrderResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

#[derive(Deserialize)]
pub struct TrackQuery {
    pub phone: Option<String>,
}

/// GET /orders/track/{order_number}?phone=...
///
/// Public endpoint. Without `phone` the response is a redacted summary
/// (no phone, receipt or notes). A supplied phone must match the one
/// the order was placed with; a mismatch answers a generic 403.
pub async fn track(
    State(state): State<ServerState>,
    Path(order_number): Path<String>,
    Query(query): Query<TrackQuery>,
) -> AppResult<Json<OrderResponse>> {
    let phone = query.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

    let order = state.orders.get_by_number(&order_number).await?;
    match phone {
        Some(p) if order.phone != p => Err(AppError::forbidden("Order access denied")),
        Some(_) => Ok(Json(OrderResponse::try_from(order)?)),
        None => Ok(Json(OrderResponse::try_from(order)?.into_public_summary())),
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// GET /orders - staff listing with optional status filter
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()?;
    let limit = query.limit.unwrap_or(100).clamp(1, 500);

    let orders = state.orders.list(status, limit).await?;
    orders
        .into_iter()
        .map(OrderResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

/// GET /orders/{id} - staff detail view
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderResponse>> {
    let order = state.orders.get_order(&id).await?;
    Ok(Json(OrderResponse::try_from(order)?))
}

#[derive(Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
    #[serde(default)]
    pub force: bool,
}

/// PATCH /orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusBody>,
) -> AppResult<Json<OrderResponse>> {
    let status = body.status.parse::<OrderStatus>()?;
    let order = state.orders.set_order_status(&id, status, body.force).await?;
    Ok(Json(OrderResponse::try_from(order)?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentBody {
    pub payment_status: String,
    #[serde(default)]
    pub mpesa_receipt: Option<String>,
    #[serde(default)]
    pub force: bool,
}

/// PATCH /orders/{id}/payment
pub async fn update_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePaymentBody>,
) -> AppResult<Json<OrderResponse>> {
    let status = body.payment_status.parse::<PaymentStatus>()?;
    let order = state
        .orders
        .set_payment_status(&id, status, body.mpesa_receipt, body.force)
        .await?;
    Ok(Json(OrderResponse::try_from(order)?))
}
