//! Menu catalog handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::orders::money;
use crate::sequence::EntityKind;
use crate::utils::validation::{self, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MenuItem> for MenuItemResponse {
    type Error = AppError;

    fn try_from(item: MenuItem) -> Result<Self, Self::Error> {
        let id = item
            .id
            .ok_or_else(|| AppError::internal("Menu item record without id"))?
            .to_string();
        Ok(Self {
            id,
            code: item.code,
            name: item.name,
            description: item.description,
            price: item.price,
            category: item.category,
            available: item.available,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub available: Option<bool>,
}

/// GET /menu
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MenuItemResponse>>> {
    let items = state.menu.find_all().await?;
    items
        .into_iter()
        .filter(|item| {
            query
                .category
                .as_deref()
                .is_none_or(|c| item.category.eq_ignore_ascii_case(c))
        })
        .filter(|item| query.available.is_none_or(|a| item.available == a))
        .map(MenuItemResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

/// GET /menu/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItemResponse>> {
    let item = state
        .menu
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?;
    Ok(Json(MenuItemResponse::try_from(item)?))
}

fn validate_item(name: &str, price: f64, category: &str, description: Option<&str>) -> AppResult<()> {
    let mut errors = Vec::new();

    if let Err(e) = validation::validate_required_text(name, "name", MAX_NAME_LEN) {
        errors.push(e.to_string());
    }
    if let Err(e) = validation::validate_required_text(category, "category", MAX_SHORT_TEXT_LEN) {
        errors.push(e.to_string());
    }
    if let Err(e) = money::validate_price(price, "price") {
        errors.push(e.to_string());
    }
    if let Some(desc) = description
        && desc.len() > MAX_NOTE_LEN
    {
        errors.push(format!("Description is too long (max {MAX_NOTE_LEN} chars)"));
    }

    validation::collect_errors(errors)
}

/// POST /menu - staff only
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItemResponse>)> {
    validate_item(&req.name, req.price, &req.category, req.description.as_deref())?;

    let code = state.allocator.allocate(EntityKind::MenuItem).await?;
    let now = Utc::now();
    let item = state
        .menu
        .create(MenuItem {
            id: None,
            code,
            name: req.name.trim().to_string(),
            description: req.description,
            price: req.price,
            category: req.category.trim().to_string(),
            available: req.available,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MenuItemResponse::try_from(item)?)))
}

/// PUT /menu/{id} - staff only
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItemResponse>> {
    let mut errors = Vec::new();
    if let Some(name) = &req.name
        && let Err(e) = validation::validate_required_text(name, "name", MAX_NAME_LEN)
    {
        errors.push(e.to_string());
    }
    if let Some(price) = req.price
        && let Err(e) = money::validate_price(price, "price")
    {
        errors.push(e.to_string());
    }
    validation::collect_errors(errors)?;

    let item = state.menu.update(&id, req).await?;
    Ok(Json(MenuItemResponse::try_from(item)?))
}

/// DELETE /menu/{id} - staff only
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.menu.delete(&id).await?;
    Ok(Json(true))
}
