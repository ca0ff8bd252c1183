use super::*;

#[tokio::test]
async fn takeaway_cash_intake_computes_totals() {
    let ctx = setup().await;
    let chapati = seed_item(&ctx, "MNU0001", "Chapati Combo", 500.0, true).await;

    let order = ctx
        .service
        .create_order(takeaway_request(
            &ctx.customer_id,
            vec![LineRequest {
                menu_item_id: chapati,
                quantity: 2,
            }],
        ))
        .await
        .unwrap();

    assert_eq!(order.subtotal, 1000.0);
    assert_eq!(order.total, 1000.0);
    assert_eq!(order.order_status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].line_subtotal, 1000.0);

    // One success notification mentioning the total
    let feed = wait_for_feed(&ctx, 1).await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].kind, NotificationKind::Success);
    assert!(feed[0].message.contains("1000"));

    // Customer stats bumped
    let customer = ctx
        .customers
        .find_by_id(&ctx.customer_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.total_orders, 1);
    assert_eq!(customer.total_spent, 1000.0);
    assert!(customer.last_order_date.is_some());
}

#[tokio::test]
async fn line_prices_are_snapshots() {
    let ctx = setup().await;
    let item_id = seed_item(&ctx, "MNU0001", "Nyama Choma", 800.0, true).await;

    let order = ctx
        .service
        .create_order(takeaway_request(
            &ctx.customer_id,
            vec![LineRequest {
                menu_item_id: item_id.clone(),
                quantity: 1,
            }],
        ))
        .await
        .unwrap();
    let order_id = order.id.clone().unwrap().to_string();

    // Raise the catalog price after intake
    ctx.menu
        .update(
            &item_id,
            crate::db::models::MenuItemUpdate {
                price: Some(950.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let refetched = ctx.service.get_order(&order_id).await.unwrap();
    assert_eq!(refetched.items[0].unit_price, 800.0);
    assert_eq!(refetched.total, 800.0);
}

#[tokio::test]
async fn order_numbers_are_date_scoped_and_well_formed() {
    let ctx = setup().await;
    let item_id = seed_item(&ctx, "MNU0001", "Chai", 50.0, true).await;

    let order = ctx
        .service
        .create_order(takeaway_request(
            &ctx.customer_id,
            vec![LineRequest {
                menu_item_id: item_id,
                quantity: 1,
            }],
        ))
        .await
        .unwrap();

    let number = &order.order_number;
    assert_eq!(number.len(), 13, "ORD + YYMMDD + NNNN: {number}");
    assert!(number.starts_with("ORD"));
    assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
    assert!(number.ends_with("0001"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_intake_yields_unique_order_numbers() {
    let ctx = setup().await;
    let item_id = seed_item(&ctx, "MNU0001", "Samosa", 100.0, true).await;

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let service = ctx.service.clone();
            let req = takeaway_request(
                &ctx.customer_id,
                vec![LineRequest {
                    menu_item_id: item_id.clone(),
                    quantity: 1,
                }],
            );
            tokio::spawn(async move { service.create_order(req).await.unwrap().order_number })
        })
        .collect();

    let mut numbers = Vec::new();
    for task in tasks {
        numbers.push(task.await.unwrap());
    }

    let mut unique = numbers.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), numbers.len(), "duplicate order numbers: {numbers:?}");
}

#[tokio::test]
async fn empty_items_are_rejected_with_no_side_effects() {
    let ctx = setup().await;

    let err = ctx
        .service
        .create_order(takeaway_request(&ctx.customer_id, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // No order, no notification, no customer mutation
    assert!(ctx.service.list(None, 100).await.unwrap().is_empty());
    assert!(ctx.notifications.find_all(false, 10).await.unwrap().is_empty());
    let customer = ctx
        .customers
        .find_by_id(&ctx.customer_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.total_orders, 0);
    assert_eq!(customer.total_spent, 0.0);
}

#[tokio::test]
async fn delivery_orders_require_street_and_city() {
    let ctx = setup().await;
    let item_id = seed_item(&ctx, "MNU0001", "Pilau", 350.0, true).await;

    let mut req = takeaway_request(
        &ctx.customer_id,
        vec![LineRequest {
            menu_item_id: item_id,
            quantity: 1,
        }],
    );
    req.order_type = OrderType::Delivery;
    req.delivery_address = Some(DeliveryAddress {
        street: "Moi Avenue 12".into(),
        city: "".into(),
        landmark: None,
        instructions: None,
    });

    let err = ctx.service.create_order(req.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    req.delivery_address = None;
    let err = ctx.service.create_order(req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Rejected before any persistence
    assert!(ctx.service.list(None, 100).await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_quantity_is_invalid_input() {
    let ctx = setup().await;
    let item_id = seed_item(&ctx, "MNU0001", "Mandazi", 30.0, true).await;

    let err = ctx
        .service
        .create_order(takeaway_request(
            &ctx.customer_id,
            vec![LineRequest {
                menu_item_id: item_id,
                quantity: 0,
            }],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn unknown_menu_item_is_not_found() {
    let ctx = setup().await;

    let err = ctx
        .service
        .create_order(takeaway_request(
            &ctx.customer_id,
            vec![LineRequest {
                menu_item_id: "menu_item:doesnotexist".into(),
                quantity: 1,
            }],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn unavailable_item_is_rejected() {
    let ctx = setup().await;
    let item_id = seed_item(&ctx, "MNU0001", "Fish Curry", 600.0, false).await;

    let err = ctx
        .service
        .create_order(takeaway_request(
            &ctx.customer_id,
            vec![LineRequest {
                menu_item_id: item_id,
                quantity: 1,
            }],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
}

#[tokio::test]
async fn multiple_validation_failures_are_reported_together() {
    let ctx = setup().await;
    let item_id = seed_item(&ctx, "MNU0001", "Chips", 150.0, true).await;

    let mut req = takeaway_request(
        &ctx.customer_id,
        vec![LineRequest {
            menu_item_id: item_id,
            quantity: 0,
        }],
    );
    req.order_type = OrderType::Delivery;
    req.delivery_address = None;

    let err = ctx.service.create_order(req).await.unwrap_err();
    match err {
        AppError::MultiValidation(errors) => assert!(errors.len() >= 2, "{errors:?}"),
        other => panic!("expected MultiValidation, got {other:?}"),
    }
}
