//! Notification feed handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Notification, NotificationKind};
use crate::utils::{AppError, AppResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Notification> for NotificationResponse {
    type Error = AppError;

    fn try_from(n: Notification) -> Result<Self, Self::Error> {
        let id = n
            .id
            .ok_or_else(|| AppError::internal("Notification record without id"))?
            .to_string();
        Ok(Self {
            id,
            title: n.title,
            message: n.message,
            kind: n.kind,
            read: n.read,
            created_at: n.created_at,
        })
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread: bool,
    pub limit: Option<i64>,
}

/// GET /notifications?unread=true
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let notifications = state.notifications.find_all(query.unread, limit).await?;
    notifications
        .into_iter()
        .map(NotificationResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: usize,
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<ServerState>,
) -> AppResult<Json<UnreadCountResponse>> {
    let count = state.notifications.count_unread().await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// PATCH /notifications/{id}/read
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationResponse>> {
    let notification = state.notifications.mark_read(&id).await?;
    Ok(Json(NotificationResponse::try_from(notification)?))
}

/// POST /notifications/read-all
pub async fn mark_all_read(State(state): State<ServerState>) -> AppResult<Json<bool>> {
    state.notifications.mark_all_read().await?;
    Ok(Json(true))
}
