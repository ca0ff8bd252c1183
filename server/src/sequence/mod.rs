//! Sequence allocator
//!
//! Issues the human-readable, zero-padded codes used across the system
//! (`ORD2508300001`, `CUST00042`, ...). One allocator serves every entity
//! kind instead of each resource re-implementing the pattern.
//!
//! The next number comes from a dedicated `counter` record bumped with a
//! single atomic `UPSERT ... SET value += 1`, keyed by kind plus the
//! current date for date-scoped kinds, so two concurrent allocations can
//! never read the same value. The unique index on the issued code remains
//! the final safety net: callers treat a duplicate-key persist failure as
//! retryable and simply draw again.

use crate::db::repository::{RepoError, RepoResult};
use chrono::Local;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Entity kinds with a formatted sequence code.
///
/// | Kind | Prefix | Width | Date-scoped |
/// |------|--------|-------|-------------|
/// | Order | ORD | 4 | yes |
/// | Transaction | TXN | 4 | yes |
/// | Employee | EMP | 4 | no |
/// | MenuItem | MNU | 4 | no |
/// | Customer | CUST | 5 | no |
/// | Expense | EXP | 4 | no |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Order,
    Transaction,
    Employee,
    MenuItem,
    Customer,
    Expense,
}

impl EntityKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Order => "ORD",
            Self::Transaction => "TXN",
            Self::Employee => "EMP",
            Self::MenuItem => "MNU",
            Self::Customer => "CUST",
            Self::Expense => "EXP",
        }
    }

    pub fn width(self) -> usize {
        match self {
            Self::Customer => 5,
            _ => 4,
        }
    }

    /// Date-scoped kinds embed `YYMMDD` and restart numbering each day.
    pub fn date_scoped(self) -> bool {
        matches!(self, Self::Order | Self::Transaction)
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Transaction => "transaction",
            Self::Employee => "employee",
            Self::MenuItem => "menu_item",
            Self::Customer => "customer",
            Self::Expense => "expense",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Counter {
    value: i64,
}

/// Issues formatted sequence codes backed by the atomic counter table.
#[derive(Clone)]
pub struct SequenceAllocator {
    db: Surreal<Db>,
}

impl SequenceAllocator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Allocate the next code for `kind`.
    ///
    /// Returns a syntactically well-formed code; uniqueness of the
    /// persisted document is enforced by the store's unique index.
    pub async fn allocate(&self, kind: EntityKind) -> RepoResult<String> {
        let date_scope = kind
            .date_scoped()
            .then(|| Local::now().format("%y%m%d").to_string());

        let key = match &date_scope {
            Some(scope) => format!("{}_{}", kind.slug(), scope),
            None => kind.slug().to_string(),
        };

        let counters: Vec<Counter> = self
            .db
            .query("UPSERT type::thing('counter', $key) SET value += 1 RETURN AFTER")
            .bind(("key", key))
            .await?
            .take(0)?;

        let value = counters
            .into_iter()
            .next()
            .map(|c| c.value)
            .ok_or_else(|| RepoError::Database("Counter upsert returned no record".to_string()))?;

        Ok(Self::format(kind, date_scope.as_deref(), value))
    }

    fn format(kind: EntityKind, date_scope: Option<&str>, value: i64) -> String {
        match date_scope {
            Some(scope) => format!(
                "{}{}{:0width$}",
                kind.prefix(),
                scope,
                value,
                width = kind.width()
            ),
            None => format!("{}{:0width$}", kind.prefix(), value, width = kind.width()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn formatting_pads_to_kind_width() {
        assert_eq!(
            SequenceAllocator::format(EntityKind::Order, Some("250830"), 7),
            "ORD2508300007"
        );
        assert_eq!(
            SequenceAllocator::format(EntityKind::Customer, None, 42),
            "CUST00042"
        );
        assert_eq!(
            SequenceAllocator::format(EntityKind::Expense, None, 1234),
            "EXP1234"
        );
    }

    #[tokio::test]
    async fn codes_increment_per_kind() {
        let db = db::connect_memory().await.unwrap();
        let allocator = SequenceAllocator::new(db);

        let first = allocator.allocate(EntityKind::Customer).await.unwrap();
        let second = allocator.allocate(EntityKind::Customer).await.unwrap();
        assert_eq!(first, "CUST00001");
        assert_eq!(second, "CUST00002");

        // Independent counter per kind
        let emp = allocator.allocate(EntityKind::Employee).await.unwrap();
        assert_eq!(emp, "EMP0001");
    }

    #[tokio::test]
    async fn order_codes_embed_the_current_date() {
        let db = db::connect_memory().await.unwrap();
        let allocator = SequenceAllocator::new(db);

        let code = allocator.allocate(EntityKind::Order).await.unwrap();
        let scope = Local::now().format("%y%m%d").to_string();
        assert_eq!(code, format!("ORD{scope}0001"));
        assert_eq!(code.len(), 3 + 6 + 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_allocations_never_collide() {
        let db = db::connect_memory().await.unwrap();
        let allocator = SequenceAllocator::new(db);

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let allocator = allocator.clone();
                tokio::spawn(async move { allocator.allocate(EntityKind::Order).await.unwrap() })
            })
            .collect();

        let mut codes = Vec::new();
        for task in tasks {
            codes.push(task.await.unwrap());
        }

        let mut unique = codes.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), codes.len(), "duplicate codes issued: {codes:?}");
    }
}
