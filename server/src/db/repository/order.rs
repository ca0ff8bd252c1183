//! Order repository
//!
//! Persistence for the order aggregate. `create` relies on the unique
//! index over `order_number`: a duplicate insert comes back as
//! [`RepoError::Duplicate`] so the intake path can re-draw a number
//! and retry.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus, PaymentStatus};
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        if id.contains(':') {
            id.parse::<RecordId>()
                .map_err(|_| RepoError::NotFound(format!("Invalid order id: {id}")))
        } else {
            Ok(RecordId::from_table_key(ORDER_TABLE, id))
        }
    }

    /// Insert a new order. Fails with `Duplicate` if the order number is taken.
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = Self::parse_id(id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_number = $number")
            .bind(("number", order_number.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders belonging to a customer, newest first
    pub async fn find_by_customer(&self, customer: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE customer = $customer ORDER BY created_at DESC")
            .bind(("customer", customer.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Staff listing with optional status filter, newest first
    pub async fn find_all(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = match status {
            Some(status) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM order WHERE order_status = $status \
                         ORDER BY created_at DESC LIMIT $limit",
                    )
                    .bind(("status", status))
                    .bind(("limit", limit))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit")
                    .bind(("limit", limit))
                    .await?
                    .take(0)?
            }
        };
        Ok(orders)
    }

    /// Persist a status change; `updated_at` is always refreshed.
    pub async fn save_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let record_id = Self::parse_id(id)?;
        let orders: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $id SET order_status = $status, updated_at = $now RETURN AFTER")
            .bind(("id", record_id))
            .bind(("status", status))
            .bind(("now", now))
            .await?
            .take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {id}")))
    }

    /// Persist a payment change. The M-PESA receipt is stored verbatim
    /// when provided (last write wins).
    pub async fn save_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
        mpesa_receipt: Option<String>,
        now: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let record_id = Self::parse_id(id)?;
        let orders: Vec<Order> = match mpesa_receipt {
            Some(receipt) => {
                self.base
                    .db()
                    .query(
                        "UPDATE $id SET payment_status = $status, mpesa_receipt = $receipt, \
                         updated_at = $now RETURN AFTER",
                    )
                    .bind(("id", record_id))
                    .bind(("status", status))
                    .bind(("receipt", receipt))
                    .bind(("now", now))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query(
                        "UPDATE $id SET payment_status = $status, updated_at = $now RETURN AFTER",
                    )
                    .bind(("id", record_id))
                    .bind(("status", status))
                    .bind(("now", now))
                    .await?
                    .take(0)?
            }
        };
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {id}")))
    }
}
