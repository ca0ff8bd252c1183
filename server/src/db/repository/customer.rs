//! Customer repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Customer;
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const CUSTOMER_TABLE: &str = "customer";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        if id.contains(':') {
            id.parse::<RecordId>()
                .map_err(|_| RepoError::NotFound(format!("Invalid customer id: {id}")))
        } else {
            Ok(RecordId::from_table_key(CUSTOMER_TABLE, id))
        }
    }

    pub async fn create(&self, customer: Customer) -> RepoResult<Customer> {
        let created: Option<Customer> = self
            .base
            .db()
            .create(CUSTOMER_TABLE)
            .content(customer)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        let record_id = Self::parse_id(id)?;
        let customer: Option<Customer> = self.base.db().select(record_id).await?;
        Ok(customer)
    }

    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<Customer>> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE phone = $phone")
            .bind(("phone", phone.to_string()))
            .await?
            .take(0)?;
        Ok(customers.into_iter().next())
    }

    pub async fn find_all(&self, limit: i64) -> RepoResult<Vec<Customer>> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(customers)
    }

    /// Bump the running order stats after a successful intake.
    ///
    /// A single UPDATE with `+=` so concurrent intakes for the same
    /// customer never lose an increment.
    pub async fn record_order(
        &self,
        id: &RecordId,
        amount: f64,
        now: DateTime<Utc>,
    ) -> RepoResult<Customer> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query(
                "UPDATE $id SET total_orders += 1, total_spent += $amount, \
                 last_order_date = $now, updated_at = $now RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("amount", amount))
            .bind(("now", now))
            .await?
            .take(0)?;
        customers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Customer {id}")))
    }
}
