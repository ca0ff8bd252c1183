use super::*;
use crate::db;
use crate::db::models::{Customer, MenuItem, Notification};
use crate::db::repository::NotificationRepository;
use std::time::Duration;

mod test_intake;
mod test_transitions;

struct TestContext {
    service: OrderService,
    customers: CustomerRepository,
    menu: MenuItemRepository,
    notifications: NotificationRepository,
    customer_id: String,
}

async fn setup() -> TestContext {
    let database = db::connect_memory().await.unwrap();
    let notifications = NotificationRepository::new(database.clone());
    let emitter = NotificationEmitter::start(notifications.clone());
    let service = OrderService::new(database.clone(), emitter);
    let customers = CustomerRepository::new(database.clone());
    let menu = MenuItemRepository::new(database);

    let customer = customers
        .create(Customer {
            id: None,
            code: "CUST00001".into(),
            name: "Wanjiku Kamau".into(),
            phone: "+254700111222".into(),
            email: None,
            total_orders: 0,
            total_spent: 0.0,
            last_order_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap();
    let customer_id = customer.id.unwrap().to_string();

    TestContext {
        service,
        customers,
        menu,
        notifications,
        customer_id,
    }
}

async fn seed_item(ctx: &TestContext, code: &str, name: &str, price: f64, available: bool) -> String {
    let item = ctx
        .menu
        .create(MenuItem {
            id: None,
            code: code.into(),
            name: name.into(),
            description: None,
            price,
            category: "Mains".into(),
            available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap();
    item.id.unwrap().to_string()
}

fn takeaway_request(customer_id: &str, items: Vec<LineRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id: customer_id.to_string(),
        items,
        order_type: OrderType::Takeaway,
        payment_method: PaymentMethod::Cash,
        delivery_address: None,
        notes: None,
    }
}

/// The emitter drains out-of-band; poll the feed until `n` entries land.
async fn wait_for_feed(ctx: &TestContext, n: usize) -> Vec<Notification> {
    for _ in 0..100 {
        let feed = ctx.notifications.find_all(false, 50).await.unwrap();
        if feed.len() >= n {
            return feed;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("notification feed never reached {n} entries");
}
