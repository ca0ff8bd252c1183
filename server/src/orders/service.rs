//! Order service
//!
//! Owns the order lifecycle: intake (validate → snapshot → total →
//! allocate number → persist → side effects), status transitions and
//! payment transitions. The fixed sequence inside one operation is the
//! only ordering guarantee; concurrent requests interleave freely at the
//! I/O layer and the unique order-number index plus a bounded retry loop
//! closes the allocation race.

use crate::db::models::{
    DeliveryAddress, NotificationKind, Order, OrderLine, OrderStatus, OrderType, PaymentMethod,
    PaymentStatus,
};
use crate::db::repository::{
    CustomerRepository, MenuItemRepository, OrderRepository, RepoError,
};
use crate::notify::NotificationEmitter;
use crate::orders::{money, status};
use crate::sequence::{EntityKind, SequenceAllocator};
use crate::utils::validation::{self, MAX_ADDRESS_LEN, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::warn;

/// Bounded retries when a freshly allocated order number loses the
/// insert race and the unique index rejects it.
const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

/// One requested line of an order: a menu item reference and a quantity.
/// Name and price are snapshotted from the catalog at intake.
#[derive(Debug, Clone)]
pub struct LineRequest {
    pub menu_item_id: String,
    pub quantity: u32,
}

/// Intake request, already parsed at the API boundary
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub items: Vec<LineRequest>,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub delivery_address: Option<DeliveryAddress>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    menu: MenuItemRepository,
    customers: CustomerRepository,
    allocator: SequenceAllocator,
    emitter: NotificationEmitter,
}

impl OrderService {
    pub fn new(db: Surreal<Db>, emitter: NotificationEmitter) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            menu: MenuItemRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            allocator: SequenceAllocator::new(db),
            emitter,
        }
    }

    /// Order intake.
    ///
    /// All validation happens before any write; the first persisted state
    /// already carries the final order number and consistent totals.
    pub async fn create_order(&self, req: CreateOrderRequest) -> AppResult<Order> {
        Self::validate_intake(&req)?;

        let customer = self
            .customers
            .find_by_id(&req.customer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Customer {}", req.customer_id)))?;
        let customer_id = customer
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Customer record without id"))?;

        // Snapshot name and price per line; later catalog changes must
        // never retroactively affect this order.
        let mut lines = Vec::with_capacity(req.items.len());
        for line_req in &req.items {
            let item = self
                .menu
                .find_by_id(&line_req.menu_item_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Menu item {}", line_req.menu_item_id))
                })?;
            if !item.available {
                return Err(AppError::unavailable(format!(
                    "{} is currently not available",
                    item.name
                )));
            }
            money::validate_price(item.price, "price")?;

            let item_id = item
                .id
                .ok_or_else(|| AppError::internal("Menu item record without id"))?;
            lines.push(OrderLine {
                menu_item: item_id,
                name: item.name,
                unit_price: item.price,
                quantity: line_req.quantity,
                line_subtotal: money::line_subtotal(item.price, line_req.quantity)?,
            });
        }

        let subtotal = money::sum_lines(&lines)?;
        // Business rule: no tax line, total equals subtotal
        let total = subtotal;

        let mut created: Option<Order> = None;
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let order_number = self.allocator.allocate(EntityKind::Order).await?;
            let now = Utc::now();
            let order = Order {
                id: None,
                order_number,
                customer: customer_id.clone(),
                phone: customer.phone.clone(),
                items: lines.clone(),
                subtotal,
                total,
                order_type: req.order_type,
                payment_method: req.payment_method,
                payment_status: PaymentStatus::Pending,
                order_status: OrderStatus::Pending,
                delivery_address: req.delivery_address.clone(),
                notes: req.notes.clone(),
                mpesa_receipt: None,
                created_at: now,
                updated_at: now,
            };

            match self.orders.create(order).await {
                Ok(order) => {
                    created = Some(order);
                    break;
                }
                Err(RepoError::Duplicate(msg)) => {
                    warn!(attempt, error = %msg, "Order number collision, re-allocating");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        let order = created.ok_or_else(|| {
            AppError::conflict("Could not allocate a unique order number, please retry")
        })?;

        // Post-persist side effects are best effort: the order exists and
        // the response must report it even if a side channel hiccups.
        if let Err(e) = self
            .customers
            .record_order(&customer_id, order.total, order.updated_at)
            .await
        {
            warn!(error = %e, order = %order.order_number, "Failed to bump customer stats");
        }

        self.emitter.emit(
            "New Order",
            format!(
                "Order {} placed: {}. Total {}",
                order.order_number,
                Self::summarize_items(&order),
                money::format_amount(order.total)
            ),
            NotificationKind::Success,
        );

        Ok(order)
    }

    /// Move an order to a new lifecycle status.
    ///
    /// Re-asserting the current status is accepted and still refreshes
    /// `updated_at`.
    pub async fn set_order_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        force: bool,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

        status::check_order_transition(order.order_status, new_status, force)?;

        let updated = self
            .orders
            .save_order_status(order_id, new_status, Utc::now())
            .await?;

        self.emitter.emit(
            "Order Status Updated",
            format!(
                "Order {} is now {}: {}",
                updated.order_number,
                new_status.as_str(),
                Self::summarize_items(&updated)
            ),
            NotificationKind::Info,
        );

        Ok(updated)
    }

    /// Move an order to a new payment status, optionally attaching the
    /// M-PESA receipt verbatim (last write wins).
    pub async fn set_payment_status(
        &self,
        order_id: &str,
        new_status: PaymentStatus,
        mpesa_receipt: Option<String>,
        force: bool,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

        status::check_payment_transition(order.payment_status, new_status, force)?;

        let updated = self
            .orders
            .save_payment_status(order_id, new_status, mpesa_receipt, Utc::now())
            .await?;

        let kind = if new_status == PaymentStatus::Paid {
            NotificationKind::Success
        } else {
            NotificationKind::Warning
        };
        self.emitter.emit(
            "Payment Updated",
            format!(
                "Order {} payment is {}. Total {}",
                updated.order_number,
                new_status.as_str(),
                money::format_amount(updated.total)
            ),
            kind,
        );

        Ok(updated)
    }

    pub async fn get_order(&self, order_id: &str) -> AppResult<Order> {
        Ok(self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?)
    }

    pub async fn get_by_number(&self, order_number: &str) -> AppResult<Order> {
        Ok(self
            .orders
            .find_by_number(order_number)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_number}")))?)
    }

    /// A customer's own orders, newest first
    pub async fn list_for_customer(&self, customer_id: &str) -> AppResult<Vec<Order>> {
        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Customer {customer_id}")))?;
        let id = customer
            .id
            .ok_or_else(|| AppError::internal("Customer record without id"))?;
        Ok(self.orders.find_by_customer(&id).await?)
    }

    /// Staff listing with optional status filter
    pub async fn list(&self, status: Option<OrderStatus>, limit: i64) -> AppResult<Vec<Order>> {
        Ok(self.orders.find_all(status, limit).await?)
    }

    fn validate_intake(req: &CreateOrderRequest) -> AppResult<()> {
        let mut errors = Vec::new();

        if req.items.is_empty() {
            errors.push("Order must contain at least one item".to_string());
        }
        for (idx, line) in req.items.iter().enumerate() {
            if line.quantity < 1 {
                errors.push(format!("Item {}: quantity must be at least 1", idx + 1));
            }
            if line.quantity > money::MAX_QUANTITY {
                errors.push(format!(
                    "Item {}: quantity exceeds maximum ({})",
                    idx + 1,
                    money::MAX_QUANTITY
                ));
            }
        }

        if req.order_type == OrderType::Delivery {
            match &req.delivery_address {
                None => errors.push("Delivery orders require a delivery address".to_string()),
                Some(addr) => {
                    if addr.street.trim().is_empty() {
                        errors.push("Delivery address street is required".to_string());
                    }
                    if addr.city.trim().is_empty() {
                        errors.push("Delivery address city is required".to_string());
                    }
                    if addr.street.len() > MAX_ADDRESS_LEN || addr.city.len() > MAX_ADDRESS_LEN {
                        errors.push("Delivery address is too long".to_string());
                    }
                }
            }
        }

        if let Some(notes) = &req.notes
            && notes.len() > MAX_NOTE_LEN
        {
            errors.push(format!("Notes are too long (max {MAX_NOTE_LEN} chars)"));
        }

        validation::collect_errors(errors)
    }

    fn summarize_items(order: &Order) -> String {
        order
            .items
            .iter()
            .map(|l| format!("{}x {}", l.quantity, l.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests;
