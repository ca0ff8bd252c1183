//! Database models

// Serde helpers
pub mod serde_helpers;

// Catalog and customers
pub mod customer;
pub mod menu_item;

// Orders
pub mod order;

// Dashboard feed
pub mod notification;

// Re-exports
pub use customer::{Customer, CustomerCreate};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use notification::{Notification, NotificationCreate, NotificationKind};
pub use order::{
    DeliveryAddress, Order, OrderLine, OrderStatus, OrderType, PaymentMethod, PaymentStatus,
};
