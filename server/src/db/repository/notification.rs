//! Notification repository (dashboard feed storage)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Notification, NotificationCreate};
use chrono::Utc;
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const NOTIFICATION_TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        if id.contains(':') {
            id.parse::<RecordId>()
                .map_err(|_| RepoError::NotFound(format!("Invalid notification id: {id}")))
        } else {
            Ok(RecordId::from_table_key(NOTIFICATION_TABLE, id))
        }
    }

    pub async fn create(&self, data: NotificationCreate) -> RepoResult<Notification> {
        let notification = Notification {
            id: None,
            title: data.title,
            message: data.message,
            kind: data.kind,
            read: false,
            created_at: Utc::now(),
        };
        let created: Option<Notification> = self
            .base
            .db()
            .create(NOTIFICATION_TABLE)
            .content(notification)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    /// Feed entries, newest first
    pub async fn find_all(&self, unread_only: bool, limit: i64) -> RepoResult<Vec<Notification>> {
        let notifications: Vec<Notification> = if unread_only {
            self.base
                .db()
                .query(
                    "SELECT * FROM notification WHERE read = false \
                     ORDER BY created_at DESC LIMIT $limit",
                )
                .bind(("limit", limit))
                .await?
                .take(0)?
        } else {
            self.base
                .db()
                .query("SELECT * FROM notification ORDER BY created_at DESC LIMIT $limit")
                .bind(("limit", limit))
                .await?
                .take(0)?
        };
        Ok(notifications)
    }

    pub async fn mark_read(&self, id: &str) -> RepoResult<Notification> {
        let record_id = Self::parse_id(id)?;
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query("UPDATE $id SET read = true RETURN AFTER")
            .bind(("id", record_id))
            .await?
            .take(0)?;
        notifications
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Notification {id}")))
    }

    pub async fn mark_all_read(&self) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE notification SET read = true WHERE read = false")
            .await?;
        Ok(())
    }

    pub async fn count_unread(&self) -> RepoResult<usize> {
        #[derive(Deserialize)]
        struct CountRow {
            count: usize,
        }

        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM notification WHERE read = false GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }
}
