//! Notification model (staff dashboard feed)
//!
//! Written as a best-effort side effect of order operations; never
//! mutated afterwards except for flipping `read`, never expired.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Severity of a feed entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Feed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload accepted by the notification sink
#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}
