//! Notification emitter
//!
//! Best-effort side channel feeding the staff dashboard. Order operations
//! call [`NotificationEmitter::emit`] and move on: the entry goes onto a
//! bounded queue drained by a background task, so a slow or failing sink
//! never adds latency or failure risk to the primary operation. A full
//! queue or a storage error is logged and the entry dropped.

use crate::db::models::{NotificationCreate, NotificationKind};
use crate::db::repository::NotificationRepository;
use tokio::sync::mpsc;
use tracing::warn;

const QUEUE_CAPACITY: usize = 256;

/// Fire-and-forget handle to the notification queue
#[derive(Clone)]
pub struct NotificationEmitter {
    tx: mpsc::Sender<NotificationCreate>,
}

impl NotificationEmitter {
    /// Create the emitter and spawn its drain task.
    pub fn start(repo: NotificationRepository) -> Self {
        let (tx, mut rx) = mpsc::channel::<NotificationCreate>(QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                if let Err(e) = repo.create(entry).await {
                    // Swallowed on purpose: the triggering operation has
                    // already succeeded and must not be failed after the fact.
                    warn!(error = %e, "Failed to persist notification");
                }
            }
        });

        Self { tx }
    }

    /// Queue a feed entry. Never blocks and never fails the caller.
    pub fn emit(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) {
        let entry = NotificationCreate {
            title: title.into(),
            message: message.into(),
            kind,
        };
        if let Err(e) = self.tx.try_send(entry) {
            warn!(error = %e, "Notification queue full, dropping entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use std::time::Duration;

    #[tokio::test]
    async fn emitted_entries_reach_the_feed() {
        let database = db::connect_memory().await.unwrap();
        let repo = NotificationRepository::new(database.clone());
        let emitter = NotificationEmitter::start(repo.clone());

        emitter.emit("New Order", "Order ORD2508300001: KES 1000.00", NotificationKind::Success);

        // Drain task runs out-of-band; poll briefly for the write.
        for _ in 0..50 {
            if repo.count_unread().await.unwrap() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let feed = repo.find_all(true, 10).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, NotificationKind::Success);
        assert!(!feed[0].read);
        assert!(feed[0].message.contains("1000"));
    }

    #[tokio::test]
    async fn mark_read_flips_the_flag() {
        let database = db::connect_memory().await.unwrap();
        let repo = NotificationRepository::new(database.clone());

        let created = repo
            .create(NotificationCreate {
                title: "Status Updated".into(),
                message: "Order ORD2508300001 is now Ready".into(),
                kind: NotificationKind::Info,
            })
            .await
            .unwrap();

        let id = created.id.unwrap().to_string();
        let updated = repo.mark_read(&id).await.unwrap();
        assert!(updated.read);
        assert_eq!(repo.count_unread().await.unwrap(), 0);
    }
}
