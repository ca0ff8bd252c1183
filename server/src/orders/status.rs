//! Order and payment status state machines
//!
//! The default path enforces the transition tables below. Staff can pass
//! an explicit `force` override to move an order anywhere, which keeps
//! the manual-correction workflow (fixing a mis-tap) available without
//! making every transition legal by default.
//!
//! Order pipeline:
//!
//! ```text
//! Pending → Confirmed → Preparing → Ready → Out for Delivery → Delivered → Completed
//!     \________________________↘ Cancelled ↙________________________/
//! ```
//!
//! Forward jumps are allowed (a takeaway order can go Pending → Ready
//! directly); moving backwards requires `force`. Re-asserting the current
//! status is a no-op that still refreshes `updated_at`.

use crate::db::models::{OrderStatus, OrderType, PaymentMethod, PaymentStatus};
use crate::utils::AppError;
use std::str::FromStr;

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "Preparing" => Ok(Self::Preparing),
            "Ready" => Ok(Self::Ready),
            "Out for Delivery" => Ok(Self::OutForDelivery),
            "Delivered" => Ok(Self::Delivered),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::validation(format!(
                "Invalid order status: {other}"
            ))),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            "Refunded" => Ok(Self::Refunded),
            other => Err(AppError::validation(format!(
                "Invalid payment status: {other}"
            ))),
        }
    }
}

impl FromStr for OrderType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "takeaway" => Ok(Self::Takeaway),
            "dine-in" => Ok(Self::DineIn),
            "delivery" => Ok(Self::Delivery),
            other => Err(AppError::validation(format!("Invalid order type: {other}"))),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M-PESA" => Ok(Self::Mpesa),
            "Cash" => Ok(Self::Cash),
            "Card" => Ok(Self::Card),
            other => Err(AppError::validation(format!(
                "Invalid payment method: {other}"
            ))),
        }
    }
}

/// Check an order-status move. `Ok` means the caller may persist it.
pub fn check_order_transition(
    from: OrderStatus,
    to: OrderStatus,
    force: bool,
) -> Result<(), AppError> {
    if from == to || force {
        return Ok(());
    }
    if from.is_terminal() {
        return Err(AppError::validation(format!(
            "Order is already {}; use force to override",
            from.as_str()
        )));
    }
    if to == OrderStatus::Cancelled {
        return Ok(());
    }
    match (from.pipeline_index(), to.pipeline_index()) {
        (Some(f), Some(t)) if t > f => Ok(()),
        _ => Err(AppError::validation(format!(
            "Invalid status transition {} -> {}; use force to override",
            from.as_str(),
            to.as_str()
        ))),
    }
}

/// Check a payment-status move.
///
/// Pending → {Paid, Failed}, Failed → {Pending, Paid} (retry after a
/// failed STK push), Paid → Refunded. Everything else needs `force`.
pub fn check_payment_transition(
    from: PaymentStatus,
    to: PaymentStatus,
    force: bool,
) -> Result<(), AppError> {
    if from == to || force {
        return Ok(());
    }
    let allowed = matches!(
        (from, to),
        (PaymentStatus::Pending, PaymentStatus::Paid)
            | (PaymentStatus::Pending, PaymentStatus::Failed)
            | (PaymentStatus::Failed, PaymentStatus::Pending)
            | (PaymentStatus::Failed, PaymentStatus::Paid)
            | (PaymentStatus::Paid, PaymentStatus::Refunded)
    );
    if allowed {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Invalid payment transition {} -> {}; use force to override",
            from.as_str(),
            to.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_jumps_are_allowed() {
        assert!(check_order_transition(OrderStatus::Pending, OrderStatus::Ready, false).is_ok());
        assert!(
            check_order_transition(OrderStatus::Confirmed, OrderStatus::Completed, false).is_ok()
        );
    }

    #[test]
    fn backwards_moves_require_force() {
        assert!(check_order_transition(OrderStatus::Ready, OrderStatus::Pending, false).is_err());
        assert!(check_order_transition(OrderStatus::Ready, OrderStatus::Pending, true).is_ok());
    }

    #[test]
    fn cancel_is_reachable_from_any_active_state() {
        for from in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
        ] {
            assert!(check_order_transition(from, OrderStatus::Cancelled, false).is_ok());
        }
    }

    #[test]
    fn terminal_states_are_locked_without_force() {
        assert!(
            check_order_transition(OrderStatus::Completed, OrderStatus::Pending, false).is_err()
        );
        assert!(
            check_order_transition(OrderStatus::Cancelled, OrderStatus::Confirmed, false).is_err()
        );
        assert!(
            check_order_transition(OrderStatus::Cancelled, OrderStatus::Confirmed, true).is_ok()
        );
    }

    #[test]
    fn same_status_is_a_noop() {
        assert!(check_order_transition(OrderStatus::Pending, OrderStatus::Pending, false).is_ok());
        assert!(
            check_payment_transition(PaymentStatus::Paid, PaymentStatus::Paid, false).is_ok()
        );
    }

    #[test]
    fn payment_graph() {
        assert!(check_payment_transition(PaymentStatus::Pending, PaymentStatus::Paid, false).is_ok());
        assert!(check_payment_transition(PaymentStatus::Failed, PaymentStatus::Paid, false).is_ok());
        assert!(check_payment_transition(PaymentStatus::Paid, PaymentStatus::Refunded, false).is_ok());
        assert!(
            check_payment_transition(PaymentStatus::Paid, PaymentStatus::Pending, false).is_err()
        );
        assert!(
            check_payment_transition(PaymentStatus::Paid, PaymentStatus::Pending, true).is_ok()
        );
    }

    #[test]
    fn unknown_status_strings_fail() {
        assert!("Shipped".parse::<OrderStatus>().is_err());
        assert!("Out for Delivery".parse::<OrderStatus>().is_ok());
        assert!("paid".parse::<PaymentStatus>().is_err());
        assert!("dine-in".parse::<OrderType>().is_ok());
        assert!("DineIn".parse::<OrderType>().is_err());
        assert!("M-PESA".parse::<PaymentMethod>().is_ok());
        assert!("mpesa".parse::<PaymentMethod>().is_err());
    }
}
